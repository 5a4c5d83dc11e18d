//! Static site data: routing table, business profile, services, pricing.
//!
//! Everything here is read-only and fixed at compile time.

use std::fmt;

use crate::form::{phone_digits, PHONE_DIGITS};

// ============================================================================
// Business Profile
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct BusinessProfile {
    pub name: &'static str,
    /// Display form, `(XXX) XXX-XXXX`
    pub phone: &'static str,
    pub email: &'static str,
    pub service_area: &'static str,
    /// External page where happy customers leave a public review
    pub review_url: &'static str,
}

pub const BUSINESS: BusinessProfile = BusinessProfile {
    name: "Queen City Pro Wash",
    phone: "(980) 316-7792",
    email: "hello@queencityprowash.com",
    service_area: "Charlotte, NC and surrounding areas",
    review_url: "https://g.page/r/queen-city-pro-wash/review",
};

/// Prefilled body for the "text us" button
pub const DEFAULT_SMS_BODY: &str = "Hi! I'd like a free estimate.";

impl BusinessProfile {
    pub fn tel_link(&self) -> Option<String> {
        tel_link(self.phone)
    }

    pub fn sms_link(&self, body: Option<&str>) -> Option<String> {
        sms_link(self.phone, body)
    }

    pub fn mailto_link(&self, subject: &str, body: &str) -> String {
        mailto_link(self.email, subject, body)
    }
}

/// E.164 form of a 10-digit US number, or `None` if it is not 10 digits
fn e164(phone: &str) -> Option<String> {
    let digits = phone_digits(phone);
    (digits.len() == PHONE_DIGITS).then(|| format!("+1{}", digits))
}

pub fn tel_link(phone: &str) -> Option<String> {
    e164(phone).map(|number| format!("tel:{}", number))
}

pub fn sms_link(phone: &str, body: Option<&str>) -> Option<String> {
    let number = e164(phone)?;
    Some(match body {
        Some(body) if !body.is_empty() => {
            format!("sms:{}?body={}", number, urlencoding::encode(body))
        }
        _ => format!("sms:{}", number),
    })
}

pub fn mailto_link(email: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        email,
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

// ============================================================================
// Services
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    HouseWashing,
    RoofCleaning,
    GutterCleaning,
    WindowCleaning,
    DrivewayCleaning,
    DeckRestoration,
}

#[derive(Debug, Clone, Copy)]
pub struct ServiceInfo {
    pub service: Service,
    pub slug: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
}

pub const SERVICES: &[ServiceInfo] = &[
    ServiceInfo {
        service: Service::HouseWashing,
        slug: "house-washing",
        name: "House Washing",
        summary: "Soft-wash siding, trim, and soffits without damaging paint.",
    },
    ServiceInfo {
        service: Service::RoofCleaning,
        slug: "roof-cleaning",
        name: "Roof Cleaning",
        summary: "Remove black streaks, moss, and algae from shingles.",
    },
    ServiceInfo {
        service: Service::GutterCleaning,
        slug: "gutter-cleaning",
        name: "Gutter Cleaning",
        summary: "Clear gutters and downspouts, then flush and check the flow.",
    },
    ServiceInfo {
        service: Service::WindowCleaning,
        slug: "window-cleaning",
        name: "Window Cleaning",
        summary: "Streak-free exterior glass, screens, and tracks.",
    },
    ServiceInfo {
        service: Service::DrivewayCleaning,
        slug: "driveway-cleaning",
        name: "Driveway & Concrete",
        summary: "Surface-clean driveways, walkways, and patios.",
    },
    ServiceInfo {
        service: Service::DeckRestoration,
        slug: "deck-restoration",
        name: "Deck & Fence Restoration",
        summary: "Strip, brighten, and prep wood for sealing.",
    },
];

impl Service {
    pub fn info(&self) -> &'static ServiceInfo {
        // Every variant has exactly one row; checked by test_every_service_has_info
        SERVICES
            .iter()
            .find(|info| info.service == *self)
            .unwrap_or(&SERVICES[0])
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        SERVICES.iter().find(|info| info.slug == slug).map(|info| info.service)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PricingTier {
    pub name: &'static str,
    /// Starting price in whole dollars
    pub starting_at: u32,
    pub includes: &'static [&'static str],
}

pub const PRICING: &[PricingTier] = &[
    PricingTier {
        name: "Essential",
        starting_at: 249,
        includes: &["House wash", "Front walkway"],
    },
    PricingTier {
        name: "Curb Appeal",
        starting_at: 449,
        includes: &["House wash", "Driveway & walkways", "Gutter brightening"],
    },
    PricingTier {
        name: "Whole Home",
        starting_at: 749,
        includes: &[
            "House wash",
            "Roof soft wash",
            "Driveway & walkways",
            "Gutter cleaning",
            "Exterior windows",
        ],
    },
];

// ============================================================================
// Routing Table
// ============================================================================

/// Every page the site serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Services,
    Service(Service),
    About,
    Faq,
    Reviews,
    Gallery,
    Contact,
    FreeEstimate,
    Privacy,
    Terms,
    /// Internal fallback after a review below the public threshold
    Feedback,
    BookingDemo,
}

impl Page {
    pub const STATIC: [Page; 12] = [
        Page::Home,
        Page::Services,
        Page::About,
        Page::Faq,
        Page::Reviews,
        Page::Gallery,
        Page::Contact,
        Page::FreeEstimate,
        Page::Privacy,
        Page::Terms,
        Page::Feedback,
        Page::BookingDemo,
    ];

    pub fn path(&self) -> String {
        match self {
            Page::Service(service) => format!("/services/{}", service.info().slug),
            other => other.static_path().to_string(),
        }
    }

    fn static_path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Services => "/services",
            Page::Service(_) => "/services",
            Page::About => "/about",
            Page::Faq => "/faq",
            Page::Reviews => "/reviews",
            Page::Gallery => "/gallery",
            Page::Contact => "/contact",
            Page::FreeEstimate => "/free-estimate",
            Page::Privacy => "/privacy",
            Page::Terms => "/terms",
            Page::Feedback => "/feedback",
            Page::BookingDemo => "/ai-booking-demo",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Services => "Services",
            Page::Service(service) => service.info().name,
            Page::About => "About Us",
            Page::Faq => "FAQ",
            Page::Reviews => "Reviews",
            Page::Gallery => "Gallery",
            Page::Contact => "Contact",
            Page::FreeEstimate => "Free Estimate",
            Page::Privacy => "Privacy Policy",
            Page::Terms => "Terms of Service",
            Page::Feedback => "Share Your Feedback",
            Page::BookingDemo => "AI Booking (Beta)",
        }
    }

    /// Resolve a request path. Trailing slashes and query strings are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };

        if let Some(slug) = path.strip_prefix("/services/") {
            return Service::from_slug(slug).map(Page::Service);
        }

        Page::STATIC.into_iter().find(|page| page.static_path() == path)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Deep links
    // -------------------------------------------------------------------------

    #[test]
    fn test_tel_link() {
        assert_eq!(tel_link("(980) 316-7792").as_deref(), Some("tel:+19803167792"));
        assert_eq!(tel_link("316-7792"), None);
        assert_eq!(BUSINESS.tel_link().as_deref(), Some("tel:+19803167792"));
    }

    #[test]
    fn test_sms_link_encodes_body() {
        assert_eq!(
            sms_link("9803167792", Some("Hi! Quote for 2 windows & a deck?")).as_deref(),
            Some("sms:+19803167792?body=Hi%21%20Quote%20for%202%20windows%20%26%20a%20deck%3F")
        );
        assert_eq!(sms_link("9803167792", None).as_deref(), Some("sms:+19803167792"));
        assert_eq!(sms_link("9803167792", Some("")).as_deref(), Some("sms:+19803167792"));
    }

    #[test]
    fn test_mailto_link() {
        assert_eq!(
            mailto_link("a@b.co", "Estimate request", "Name: Sam"),
            "mailto:a@b.co?subject=Estimate%20request&body=Name%3A%20Sam"
        );
    }

    // -------------------------------------------------------------------------
    // Routing
    // -------------------------------------------------------------------------

    #[test]
    fn test_every_service_has_info() {
        let services = [
            Service::HouseWashing,
            Service::RoofCleaning,
            Service::GutterCleaning,
            Service::WindowCleaning,
            Service::DrivewayCleaning,
            Service::DeckRestoration,
        ];
        for service in services {
            assert_eq!(service.info().service, service);
        }
        assert_eq!(SERVICES.len(), services.len());
    }

    #[test]
    fn test_page_paths_round_trip() {
        for page in Page::STATIC {
            assert_eq!(Page::from_path(&page.path()), Some(page));
        }
        for info in SERVICES {
            let page = Page::Service(info.service);
            assert_eq!(Page::from_path(&page.path()), Some(page));
        }
    }

    #[test]
    fn test_page_from_path_normalizes() {
        assert_eq!(Page::from_path(""), Some(Page::Home));
        assert_eq!(Page::from_path("/gallery/"), Some(Page::Gallery));
        assert_eq!(Page::from_path("/faq?ref=ad"), Some(Page::Faq));
        assert_eq!(
            Page::from_path("/services/roof-cleaning#pricing"),
            Some(Page::Service(Service::RoofCleaning))
        );
        assert_eq!(Page::from_path("/services/car-detailing"), None);
        assert_eq!(Page::from_path("/blog"), None);
    }

    #[test]
    fn test_pricing_tiers_ascend() {
        assert!(PRICING.windows(2).all(|pair| pair[0].starting_at < pair[1].starting_at));
    }
}
