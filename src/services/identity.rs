use rand::seq::SliceRandom;

/// Supplies the User-Agent the orchestrator sends, once per request.
/// Returning None leaves the HTTP client's own default in place.
pub trait ClientIdentity: Send + Sync {
    fn user_agent(&self) -> Option<String>;
}

const DESKTOP_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 Edg/123.0.0.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4.1 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Picks a desktop browser User-Agent at random for every request
#[derive(Debug, Clone, Default)]
pub struct RandomUserAgent;

impl ClientIdentity for RandomUserAgent {
    fn user_agent(&self) -> Option<String> {
        DESKTOP_USER_AGENTS
            .choose(&mut rand::thread_rng())
            .map(|ua| ua.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct StaticUserAgent(pub String);

impl ClientIdentity for StaticUserAgent {
    fn user_agent(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoUserAgent;

impl ClientIdentity for NoUserAgent {
    fn user_agent(&self) -> Option<String> {
        None
    }
}
