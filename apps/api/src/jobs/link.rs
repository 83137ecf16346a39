//! Job-posting URL helpers: normalization, restricted-site detection, and
//! host-derived company names.

use url::Url;

use crate::models::job::RestrictionCheck;

/// Hosts whose job pages refuse automated fetching. Subdomains match too.
const RESTRICTED_HOSTS: &[(&str, &str)] = &[(
    "linkedin.com",
    "LinkedIn blocks automated access to its job postings. Please copy and paste the job description text instead.",
)];

/// Host labels that say nothing about the employer.
const GENERIC_HOST_LABELS: &[&str] = &["www", "jobs", "careers", "boards", "apply", "app"];

/// Returns the normalized absolute URL, or `""` when the link is empty,
/// unparseable, or not `http`/`https`.
pub fn normalize_job_link(link: Option<&str>) -> String {
    let Some(link) = link.map(str::trim).filter(|l| !l.is_empty()) else {
        return String::new();
    };

    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        _ => String::new(),
    }
}

/// Flags job sites that block scraping. Unparseable URLs are not restricted.
pub fn is_restricted_job_site(url: &str) -> RestrictionCheck {
    let Some(host) = lenient_host(url) else {
        return RestrictionCheck::allowed();
    };

    RESTRICTED_HOSTS
        .iter()
        .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{domain}")))
        .map(|(_, message)| RestrictionCheck::restricted(*message))
        .unwrap_or_else(RestrictionCheck::allowed)
}

/// Lower-cased hostname, assuming `https://` when the scheme is missing.
pub fn lenient_host(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let parsed = if url.contains("://") {
        Url::parse(url)
    } else {
        Url::parse(&format!("https://{url}"))
    };

    parsed
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .filter(|h| !h.is_empty())
}

/// Guesses an employer name from a job URL's hostname.
///
/// Drops generic labels (`www`, `careers`, ...) and takes the second-to-last
/// remaining label, so `careers.microsoft.com` gives `Microsoft`. Multi-part
/// TLDs such as `.co.uk` are not handled.
pub fn company_from_link(link: &str) -> Option<String> {
    let host = lenient_host(link)?;
    let labels: Vec<&str> = host
        .split('.')
        .filter(|label| !label.is_empty() && !GENERIC_HOST_LABELS.contains(label))
        .collect();

    let label = match labels.len() {
        0 => return None,
        1 => labels[0],
        n => labels[n - 2],
    };

    let mut chars = label.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
}
