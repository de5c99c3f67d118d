use board_logging::board_debug;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agency {
    /// Matched as a substring of the normalized host.
    pub domain: &'static str,
    pub logo_url: &'static str,
}

/// Known staffing agencies, first match wins.
pub const AGENCIES: &[Agency] = &[
    Agency {
        domain: "randstad.be",
        logo_url: "https://logo.clearbit.com/randstad.be",
    },
    Agency {
        domain: "adecco.be",
        logo_url: "https://logo.clearbit.com/adecco.be",
    },
    Agency {
        domain: "tempo-team.be",
        logo_url: "https://logo.clearbit.com/tempo-team.be",
    },
    Agency {
        domain: "startpeople.be",
        logo_url: "https://logo.clearbit.com/startpeople.be",
    },
    Agency {
        domain: "manpower.be",
        logo_url: "https://logo.clearbit.com/manpower.be",
    },
    Agency {
        domain: "accentjobs.be",
        logo_url: "https://logo.clearbit.com/accentjobs.be",
    },
    Agency {
        domain: "unique.be",
        logo_url: "https://logo.clearbit.com/unique.be",
    },
    Agency {
        domain: "synergiejobs.be",
        logo_url: "https://logo.clearbit.com/synergiejobs.be",
    },
    Agency {
        domain: "trace.be",
        logo_url: "https://logo.clearbit.com/trace.be",
    },
    Agency {
        domain: "asap.be",
        logo_url: "https://logo.clearbit.com/asap.be",
    },
    Agency {
        domain: "daoust.be",
        logo_url: "https://logo.clearbit.com/daoust.be",
    },
    Agency {
        domain: "t-interim.be",
        logo_url: "https://logo.clearbit.com/t-interim.be",
    },
];

/// Regional Randstad sites and job boards all collapse to one brand domain.
const BRAND_MARKER: &str = "randstad";
const BRAND_DOMAIN: &str = "randstad.be";

const HOST_PREFIXES: &[&str] = &["www.", "www2."];

/// Normalized agency domain for a listing link.
///
/// Returns `None` when the link is not a URL with a host, unless it still
/// mentions the canonical brand.
pub fn resolve_domain(link: &str) -> Option<String> {
    let host = match Url::parse(link.trim()) {
        Ok(url) => match url.host_str() {
            Some(host) => host.to_ascii_lowercase(),
            None => return brand_fallback(link),
        },
        Err(err) => {
            board_debug!("Could not parse job link {:?}: {}", link, err);
            return brand_fallback(link);
        }
    };

    if host.contains(BRAND_MARKER) {
        return Some(BRAND_DOMAIN.to_string());
    }

    let stripped = HOST_PREFIXES
        .iter()
        .find_map(|prefix| host.strip_prefix(prefix))
        .unwrap_or(&host);
    Some(stripped.to_string())
}

/// First agency whose domain appears in the link's normalized host.
pub fn resolve_agency(link: &str) -> Option<&'static Agency> {
    let domain = resolve_domain(link)?;
    AGENCIES
        .iter()
        .find(|agency| domain.contains(agency.domain))
}

pub fn resolve_logo(link: &str) -> Option<&'static str> {
    resolve_agency(link).map(|agency| agency.logo_url)
}

fn brand_fallback(raw: &str) -> Option<String> {
    raw.to_lowercase()
        .contains(BRAND_MARKER)
        .then(|| BRAND_DOMAIN.to_string())
}
