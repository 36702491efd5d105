//! Locale Tables
//!
//! Static locale configuration and the message catalog for the
//! storefront pages. Lookup falls back to English, then to the key
//! itself, so a missing translation renders something legible rather
//! than erroring.

/// A supported locale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Locale {
    /// BCP 47 code
    pub code: &'static str,

    /// Native display name
    pub name: &'static str,
}

/// Locales the storefront serves
pub const LOCALES: &[Locale] = &[
    Locale {
        code: "en-US",
        name: "English",
    },
    Locale {
        code: "hi-IN",
        name: "हिंदी",
    },
];

/// Locale used when the route carries none
pub const DEFAULT_LOCALE: &str = "en-US";

/// Text direction of a locale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Whether a locale code is in the locale table
pub fn supported(code: &str) -> bool {
    LOCALES.iter().any(|locale| locale.code == code)
}

/// Text direction for a locale code
pub fn direction(code: &str) -> Direction {
    if code.starts_with("ar") {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}

/// Translate a message key for a locale.
pub fn translate(locale: &str, key: &'static str) -> &'static str {
    let localized = match locale {
        "hi-IN" => hindi(key),
        _ => None,
    };
    localized.or_else(|| english(key)).unwrap_or(key)
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "home.welcome" => "Welcome to our store",
        "home.categories" => "Categories to explore",
        "home.deals" => "Today's Deals",
        "home.best_sellers" => "Best Selling Products",
        "success.title" => "Thanks for your purchase",
        "success.body" => "We are now processing your order.",
        "success.view_order" => "View order",
        "processing.title" => "Payment Processing",
        "processing.body" => "Your order is being processed.",
        "verify_error.title" => "Payment Verification Error",
        "verify_error.body" => {
            "There was an issue verifying your payment. Please contact support."
        }
        "not_found.title" => "Not Found",
        "not_found.body" => "We could not find the page or order you were looking for.",
        _ => return None,
    })
}

fn hindi(key: &str) -> Option<&'static str> {
    Some(match key {
        "home.welcome" => "हमारे स्टोर में आपका स्वागत है",
        "home.categories" => "श्रेणियाँ देखें",
        "home.deals" => "आज के ऑफ़र",
        "home.best_sellers" => "सबसे ज़्यादा बिकने वाले उत्पाद",
        "success.title" => "आपकी खरीदारी के लिए धन्यवाद",
        "success.body" => "हम अब आपका ऑर्डर संसाधित कर रहे हैं।",
        "success.view_order" => "ऑर्डर देखें",
        "processing.title" => "भुगतान प्रक्रिया में है",
        "processing.body" => "आपका ऑर्डर संसाधित किया जा रहा है।",
        "verify_error.title" => "भुगतान सत्यापन त्रुटि",
        "verify_error.body" => {
            "आपके भुगतान को सत्यापित करने में समस्या हुई। कृपया सहायता से संपर्क करें।"
        }
        "not_found.title" => "नहीं मिला",
        "not_found.body" => "आप जो पृष्ठ या ऑर्डर खोज रहे थे वह हमें नहीं मिला।",
        _ => return None,
    })
}
