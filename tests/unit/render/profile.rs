use super::*;

const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";
const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36";
const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0";
const IOS_CHROME: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/124.0 Mobile/15E148 Safari/604.1";

#[test]
fn classifies_common_agents() {
    assert_eq!(EngineProfile::from_user_agent(SAFARI_MAC).engine(), Engine::Safari);
    assert_eq!(EngineProfile::from_user_agent(CHROME_WIN).engine(), Engine::Chrome);
    assert_eq!(EngineProfile::from_user_agent(ANDROID).engine(), Engine::Android);
    assert_eq!(EngineProfile::from_user_agent(FIREFOX).engine(), Engine::Firefox);
    assert_eq!(EngineProfile::from_user_agent("curl/8.0").engine(), Engine::Other);
}

#[test]
fn ios_browsers_share_the_safari_engine() {
    let p = EngineProfile::from_user_agent(IOS_CHROME);
    assert_eq!(p.engine(), Engine::Safari);
    assert_eq!(p.concealer().blur_px, 0.0);
}

#[test]
fn base_filter_strength_per_engine() {
    assert_eq!(
        EngineProfile::from_user_agent(SAFARI_MAC).base_filter().to_string(),
        "brightness(1.02) contrast(1.02)"
    );
    assert_eq!(
        EngineProfile::from_user_agent(CHROME_WIN).base_filter().to_string(),
        "brightness(1.04) contrast(1.04)"
    );
    assert_eq!(
        EngineProfile::from_user_agent(FIREFOX).base_filter().to_string(),
        "brightness(1.03) contrast(1.03)"
    );
}

#[test]
fn concealer_settings_follow_engine() {
    let android = EngineProfile::from_user_agent(ANDROID).concealer();
    assert_eq!(android.blend, CompositeOp::Overlay);
    assert_eq!(android.blur_px, 5.0);
    assert_eq!(EngineProfile::default().concealer().blur_px, 3.0);
    assert_eq!(EngineProfile::new(Engine::Safari).default_concealer_opacity(), 0.12);
    assert_eq!(EngineProfile::default().default_concealer_opacity(), 0.18);
}
