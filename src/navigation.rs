//! Navigation policy: decides, synchronously, what happens to every navigation
//! the rendering surface is about to perform.

use crate::platform::ExternalOpener;
use log::debug;
use url::Url;

/// The blank page the surface may navigate to while loading inline content.
pub const BLANK_PAGE: &str = "about:blank";

/// A navigation the surface asks permission for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Target URL as reported by the surface, if any
    pub url: Option<String>,
    /// Whether the navigation replaces the top-level document
    pub targets_main_frame: bool,
}

impl NavigationRequest {
    pub fn main_frame(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            targets_main_frame: true,
        }
    }

    pub fn subframe(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            targets_main_frame: false,
        }
    }

    /// A request that carries no URL at all.
    pub fn without_url(targets_main_frame: bool) -> Self {
        Self {
            url: None,
            targets_main_frame,
        }
    }
}

/// Outcome of a navigation decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// First-party content or the blank page: proceed in the surface
    AllowInPlace,
    /// A nested frame load; it cannot replace the visible document
    AllowSubframe,
    /// Cancel in the surface and hand the URL to the external handler
    OpenExternally(Url),
    /// Malformed or missing URL: cancel without dispatching anywhere
    Cancel,
}

impl NavigationDecision {
    /// Whether the surface may proceed with the navigation.
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            NavigationDecision::AllowInPlace | NavigationDecision::AllowSubframe
        )
    }

    /// URL to dispatch externally, if the decision calls for it.
    pub fn external_url(&self) -> Option<&Url> {
        match self {
            NavigationDecision::OpenExternally(url) => Some(url),
            _ => None,
        }
    }
}

/// Classifies navigation requests against the first-party content root
#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    content_root: Url,
}

impl NavigationPolicy {
    pub fn new(content_root: Url) -> Self {
        Self { content_root }
    }

    pub fn decide(&self, request: &NavigationRequest) -> NavigationDecision {
        let target = match request
            .url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| Url::parse(s).ok())
        {
            Some(u) => u,
            None => return NavigationDecision::Cancel,
        };

        if target.as_str() == BLANK_PAGE || self.is_first_party(&target) {
            return NavigationDecision::AllowInPlace;
        }

        if !request.targets_main_frame {
            return NavigationDecision::AllowSubframe;
        }

        NavigationDecision::OpenExternally(target)
    }

    /// Decide `request` and hand a foreign top-level target to `opener`.
    pub fn decide_and_dispatch(
        &self,
        request: &NavigationRequest,
        opener: &dyn ExternalOpener,
    ) -> NavigationDecision {
        let decision = self.decide(request);
        match &decision {
            NavigationDecision::OpenExternally(url) => {
                debug!("opening {} externally", url);
                opener.open(url);
            }
            NavigationDecision::Cancel => {
                debug!("navigation without a usable URL cancelled: {:?}", request.url)
            }
            _ => {}
        }
        decision
    }

    /// True when `target` lives beneath the content root. Compared by scheme,
    /// host, port and path prefix, so opaque-origin roots such as `file://`
    /// bundles still match.
    pub fn is_first_party(&self, target: &Url) -> bool {
        let root = &self.content_root;
        if target.scheme() != root.scheme()
            || target.host_str() != root.host_str()
            || target.port_or_known_default() != root.port_or_known_default()
        {
            return false;
        }
        let root_path = root.path();
        let path = target.path();
        if root_path.ends_with('/') {
            path.starts_with(root_path)
        } else {
            path == root_path
                || path
                    .strip_prefix(root_path)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
    }
}
