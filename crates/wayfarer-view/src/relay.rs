//! Typed remote calls on a tab's surface.
//!
//! The UI process sometimes needs to drive a tab directly (back, reload,
//! zoom, find). Only the operations listed in [`RelayCall`] can be invoked;
//! anything else fails to deserialize.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wayfarer_common::TabId;

use crate::error::ViewError;
use crate::surface::Surface;

fn default_forward() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "kebab-case")]
pub enum RelayCall {
    GoBack,
    GoForward,
    Reload,
    Stop,
    LoadUrl {
        url: String,
    },
    GetUrl,
    GetTitle,
    CanGoBack,
    CanGoForward,
    GetZoomFactor,
    SetZoomFactor {
        factor: f64,
    },
    FindInPage {
        text: String,
        #[serde(default = "default_forward")]
        forward: bool,
    },
    StopFindInPage,
    OpenDevtools,
}

/// A relay call addressed to a tab, with an optional reply correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayRequest {
    pub tab_id: TabId,
    #[serde(flatten)]
    pub call: RelayCall,
    #[serde(default)]
    pub call_id: Option<String>,
}

impl RelayCall {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoBack => "go-back",
            Self::GoForward => "go-forward",
            Self::Reload => "reload",
            Self::Stop => "stop",
            Self::LoadUrl { .. } => "load-url",
            Self::GetUrl => "get-url",
            Self::GetTitle => "get-title",
            Self::CanGoBack => "can-go-back",
            Self::CanGoForward => "can-go-forward",
            Self::GetZoomFactor => "get-zoom-factor",
            Self::SetZoomFactor { .. } => "set-zoom-factor",
            Self::FindInPage { .. } => "find-in-page",
            Self::StopFindInPage => "stop-find-in-page",
            Self::OpenDevtools => "open-devtools",
        }
    }

    /// Run the call against a live surface. Commands return `null`.
    pub(crate) fn invoke(&self, surface: &mut dyn Surface) -> Result<Value, ViewError> {
        match self {
            Self::GoBack => surface.go_back().map(|_| Value::Null),
            Self::GoForward => surface.go_forward().map(|_| Value::Null),
            Self::Reload => surface.reload().map(|_| Value::Null),
            Self::Stop => surface.stop().map(|_| Value::Null),
            Self::LoadUrl { url } => surface.load_url(url).map(|_| Value::Null),
            Self::GetUrl => Ok(json!(surface.url())),
            Self::GetTitle => Ok(json!(surface.title())),
            Self::CanGoBack => Ok(json!(surface.can_go_back())),
            Self::CanGoForward => Ok(json!(surface.can_go_forward())),
            Self::GetZoomFactor => Ok(json!(surface.zoom_factor())),
            Self::SetZoomFactor { factor } => {
                if !(0.25..=5.0).contains(factor) {
                    return Err(ViewError::Navigation(format!(
                        "zoom factor {factor} outside [0.25, 5.0]"
                    )));
                }
                surface.set_zoom_factor(*factor).map(|_| Value::Null)
            }
            Self::FindInPage { text, forward } => {
                surface.find_in_page(text, *forward).map(|_| Value::Null)
            }
            Self::StopFindInPage => surface.stop_find_in_page().map(|_| Value::Null),
            Self::OpenDevtools => {
                surface.open_devtools();
                Ok(Value::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_call_with_args() {
        let req: RelayRequest = serde_json::from_str(
            r#"{"tab_id": 3, "method": "load-url", "args": {"url": "https://a.test"}, "call_id": "c1"}"#,
        )
        .unwrap();
        assert_eq!(req.tab_id, TabId(3));
        assert_eq!(
            req.call,
            RelayCall::LoadUrl {
                url: "https://a.test".into()
            }
        );
        assert_eq!(req.call_id.as_deref(), Some("c1"));
    }

    #[test]
    fn parses_call_without_args_or_id() {
        let req: RelayRequest =
            serde_json::from_str(r#"{"tab_id": 1, "method": "can-go-back"}"#).unwrap();
        assert_eq!(req.call, RelayCall::CanGoBack);
        assert_eq!(req.call_id, None);
    }

    #[test]
    fn find_defaults_to_forward() {
        let req: RelayRequest = serde_json::from_str(
            r#"{"tab_id": 1, "method": "find-in-page", "args": {"text": "rust"}}"#,
        )
        .unwrap();
        assert_eq!(
            req.call,
            RelayCall::FindInPage {
                text: "rust".into(),
                forward: true
            }
        );
    }

    #[test]
    fn unknown_method_is_rejected() {
        let result: Result<RelayRequest, _> = serde_json::from_str(
            r#"{"tab_id": 1, "method": "executeJavaScript", "args": ["alert(1)"]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn names_match_wire_format() {
        let call = RelayCall::SetZoomFactor { factor: 1.5 };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["method"], call.name());
        assert_eq!(RelayCall::OpenDevtools.name(), "open-devtools");
    }
}
