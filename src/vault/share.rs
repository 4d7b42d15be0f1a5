//! Unseal key fragments.
//!
//! A [`Share`] is trust material: it is wiped from memory when dropped, its
//! `Debug` output is redacted and it deliberately has no `Display`. The only
//! place its contents leave the process is the body of an unseal request.

use crate::vault::UnsealError;
use serde::Serialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One unseal key fragment.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Share(String);

impl Share {
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Share(***)")
    }
}

/// Body of `PUT /v1/sys/unseal`.
#[derive(Serialize)]
pub(crate) struct UnsealRequest<'a> {
    pub key: &'a str,
}

impl<'a> From<&'a Share> for UnsealRequest<'a> {
    fn from(share: &'a Share) -> Self {
        Self { key: share.expose() }
    }
}

/// Ordered, non-empty sequence of shares, tried in the order given.
#[derive(Debug)]
pub struct Shares(Vec<Share>);

impl Shares {
    pub fn new(keys: Vec<String>) -> Result<Self, UnsealError> {
        if keys.is_empty() {
            return Err(UnsealError::Configuration(
                "At least one unseal key is required".to_string(),
            ));
        }

        let mut shares = Vec::with_capacity(keys.len());
        let mut blank = None;
        for (i, key) in keys.into_iter().enumerate() {
            if blank.is_none() && key.trim().is_empty() {
                blank = Some(i + 1);
            }
            shares.push(Share(key));
        }

        // Shares collected so far are zeroized as the vector drops.
        if let Some(position) = blank {
            return Err(UnsealError::Configuration(format!(
                "Unseal key #{} is blank",
                position
            )));
        }

        Ok(Self(shares))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Share> {
        self.0.iter()
    }
}
