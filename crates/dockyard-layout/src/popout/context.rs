use dockyard_common::WindowHandle;

/// Query parameter that marks a window as a popout and names the storage
/// key holding its config.
pub const WINDOW_QUERY_KEY: &str = "gl-window";

/// Identity of the window a manager runs in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowContext {
    /// Set for windows opened by another manager.
    pub handle: Option<WindowHandle>,
    pub url: String,
}

impl WindowContext {
    pub fn main(url: impl Into<String>) -> Self {
        Self {
            handle: None,
            url: url.into(),
        }
    }

    pub fn for_window(handle: WindowHandle, url: impl Into<String>) -> Self {
        Self {
            handle: Some(handle),
            url: url.into(),
        }
    }

    /// The storage key from the `gl-window` query parameter, if present.
    pub fn sub_window_key(&self) -> Option<String> {
        let (_, query) = self.url.split_once('?')?;
        let query = query.split('#').next().unwrap_or_default();
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == WINDOW_QUERY_KEY)
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
    }

    /// URL for a new popout window whose config sits under `key`.
    pub fn popout_url(&self, key: &str) -> String {
        format!("{}?{WINDOW_QUERY_KEY}={key}", self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_window_has_no_key() {
        assert_eq!(WindowContext::main("app.html").sub_window_key(), None);
        assert_eq!(WindowContext::main("app.html?x=1").sub_window_key(), None);
        assert_eq!(WindowContext::main("app.html?gl-window=").sub_window_key(), None);
    }

    #[test]
    fn key_is_read_from_query() {
        let ctx = WindowContext::for_window(WindowHandle(3), "app.html?a=b&gl-window=k1#top");
        assert_eq!(ctx.sub_window_key().as_deref(), Some("k1"));
    }

    #[test]
    fn popout_url_replaces_query() {
        let ctx = WindowContext::main("http://host/app.html?theme=dark");
        assert_eq!(ctx.popout_url("abc"), "http://host/app.html?gl-window=abc");
    }
}
