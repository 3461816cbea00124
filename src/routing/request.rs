//! Transport-neutral view of an inbound request.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::http::HeaderMap;

/// Case-insensitive header access over any header container.
pub trait HeaderLookup {
    /// Value of the header `name`, matched without regard to ASCII case.
    fn header(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl HeaderLookup for HeaderMap {
    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        // Non-UTF-8 values still count as "present"; they just never match.
        self.get(name).map(|value| String::from_utf8_lossy(value.as_bytes()))
    }
}

impl HeaderLookup for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name)
            .or_else(|| {
                self.iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(|value| Cow::Borrowed(value.as_str()))
    }
}

/// The parts of a request the gate looks at. The body is never read.
pub struct GateRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub headers: &'a dyn HeaderLookup,
}

impl<'a> GateRequest<'a> {
    pub fn new(method: &'a str, path: &'a str, headers: &'a dyn HeaderLookup) -> Self {
        Self {
            method,
            path,
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<Cow<'a, str>> {
        self.headers.header(name)
    }
}
