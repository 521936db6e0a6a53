//! Rendering-engine classification and the tuning constants hanging off it.

use crate::raster::blend::CompositeOp;
use crate::raster::filter::Filter;

/// Engine family derived from a user-agent string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Safari on macOS and every iOS browser.
    Safari,
    Android,
    Chrome,
    Firefox,
    #[default]
    Other,
}

/// Concealer blur and blend tuning per engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConcealerSettings {
    pub blur_px: f32,
    pub blend: CompositeOp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineProfile {
    engine: Engine,
    /// Desktop Safari only; iOS browsers other than Safari report false.
    safari_browser: bool,
    chrome_like: bool,
}

impl EngineProfile {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            safari_browser: engine == Engine::Safari,
            chrome_like: matches!(engine, Engine::Chrome | Engine::Android),
        }
    }

    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let ios = ["ipad", "iphone", "ipod"].iter().any(|d| ua.contains(d));
        let safari = is_plain_safari(&ua);
        let android = ua.contains("android");
        let chrome = ua.contains("chrome");
        let firefox = ua.contains("firefox");

        let engine = if ios || safari {
            Engine::Safari
        } else if android {
            Engine::Android
        } else if chrome {
            Engine::Chrome
        } else if firefox {
            Engine::Firefox
        } else {
            Engine::Other
        };
        Self {
            engine,
            safari_browser: safari,
            chrome_like: chrome,
        }
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn is_safari(&self) -> bool {
        self.safari_browser
    }

    /// Brightness/contrast applied to the base frame.
    pub fn base_filter(&self) -> Filter {
        let k = if self.safari_browser {
            1.02
        } else if self.chrome_like {
            1.04
        } else {
            1.03
        };
        Filter::brightness_contrast(k, k)
    }

    pub fn concealer(&self) -> ConcealerSettings {
        match self.engine {
            Engine::Safari => ConcealerSettings {
                blur_px: 0.0,
                blend: CompositeOp::SoftLight,
            },
            Engine::Android => ConcealerSettings {
                blur_px: 5.0,
                blend: CompositeOp::Overlay,
            },
            Engine::Chrome => ConcealerSettings {
                blur_px: 4.2,
                blend: CompositeOp::SoftLight,
            },
            Engine::Firefox => ConcealerSettings {
                blur_px: 4.0,
                blend: CompositeOp::SoftLight,
            },
            Engine::Other => ConcealerSettings {
                blur_px: 3.0,
                blend: CompositeOp::SoftLight,
            },
        }
    }

    pub fn default_concealer_opacity(&self) -> f64 {
        if self.safari_browser { 0.12 } else { 0.18 }
    }
}

// Safari proper: a "safari" token with no "chrome" or "android" before it.
fn is_plain_safari(ua: &str) -> bool {
    match ua.find("safari") {
        Some(at) => {
            let head = &ua[..at];
            !head.contains("chrome") && !head.contains("android")
        }
        None => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/profile.rs"]
mod tests;
