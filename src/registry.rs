//! Static cipher catalog and slug dispatch.
//!
//! The table is built once, on first use, from explicit per-family
//! registration calls. Slugs it does not know are handed to the dynamic
//! resolver before dispatch gives up with [`CipherError::UnknownCipher`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::debug;

use crate::ciphers;
use crate::dynamic;
use crate::error::{CipherError, Result};
use crate::params::{ParamSpec, Params};

/// A cipher direction: `(text, params) -> text`.
pub type Transform = Arc<dyn Fn(&str, &Params) -> Result<String> + Send + Sync>;

/// Metadata plus encrypt/decrypt operations for one addressable cipher.
///
/// `decrypt` is `None` for ciphers without a usable inverse; calling
/// [`CipherDescriptor::decrypt`] on those yields [`CipherError::Unsupported`].
#[derive(Clone)]
pub struct CipherDescriptor {
    slug: Cow<'static, str>,
    name: Cow<'static, str>,
    description: Cow<'static, str>,
    params: &'static [ParamSpec],
    encrypt: Transform,
    decrypt: Option<Transform>,
    lossy: bool,
}

impl CipherDescriptor {
    pub fn new<F>(
        slug: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        encrypt: F,
    ) -> Self
    where
        F: Fn(&str, &Params) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: description.into(),
            params: &[],
            encrypt: Arc::new(encrypt),
            decrypt: None,
            lossy: false,
        }
    }

    pub fn with_params(mut self, params: &'static [ParamSpec]) -> Self {
        self.params = params;
        self
    }

    pub fn with_decrypt<F>(mut self, decrypt: F) -> Self
    where
        F: Fn(&str, &Params) -> Result<String> + Send + Sync + 'static,
    {
        self.decrypt = Some(Arc::new(decrypt));
        self
    }

    /// A decrypt that only approximates the plaintext. Calls still succeed,
    /// but the cipher does not count as reversible.
    pub fn with_lossy_decrypt<F>(mut self, decrypt: F) -> Self
    where
        F: Fn(&str, &Params) -> Result<String> + Send + Sync + 'static,
    {
        self.decrypt = Some(Arc::new(decrypt));
        self.lossy = true;
        self
    }

    /// Uses the encrypt transform for decryption too.
    pub fn self_inverse(mut self) -> Self {
        self.decrypt = Some(Arc::clone(&self.encrypt));
        self
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameter schema, in display order.
    pub fn params(&self) -> &'static [ParamSpec] {
        self.params
    }

    /// `true` when decryption recovers the canonical plaintext.
    pub fn is_reversible(&self) -> bool {
        self.decrypt.is_some() && !self.lossy
    }

    /// `true` when [`CipherDescriptor::decrypt`] does not fail with
    /// [`CipherError::Unsupported`], exact or not.
    pub fn can_decrypt(&self) -> bool {
        self.decrypt.is_some()
    }

    pub fn encrypt(&self, text: &str, params: &Params) -> Result<String> {
        (self.encrypt)(text, params)
    }

    pub fn decrypt(&self, text: &str, params: &Params) -> Result<String> {
        match &self.decrypt {
            Some(decrypt) => decrypt(text, params),
            None => Err(CipherError::Unsupported(self.slug.to_string())),
        }
    }
}

impl fmt::Debug for CipherDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherDescriptor")
            .field("slug", &self.slug)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("reversible", &self.is_reversible())
            .finish_non_exhaustive()
    }
}

impl Serialize for CipherDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CipherDescriptor", 6)?;
        s.serialize_field("slug", &self.slug)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("description", &self.description)?;
        s.serialize_field("params", self.params)?;
        s.serialize_field("reversible", &self.is_reversible())?;
        s.serialize_field("can_decrypt", &self.can_decrypt())?;
        s.end()
    }
}

/// Slug-keyed table of statically known ciphers.
#[derive(Default)]
pub struct Registry {
    ciphers: HashMap<String, CipherDescriptor>,
}

impl Registry {
    /// The full built-in catalog.
    pub fn builtin() -> Self {
        let mut reg = Self::default();
        ciphers::register_all(&mut reg);
        debug!(count = reg.len(), "cipher registry built");
        reg
    }

    pub fn register(&mut self, descriptor: CipherDescriptor) {
        let slug = descriptor.slug().to_string();
        let previous = self.ciphers.insert(slug, descriptor);
        debug_assert!(previous.is_none(), "cipher slug registered twice");
    }

    pub fn get(&self, slug: &str) -> Option<&CipherDescriptor> {
        self.ciphers.get(slug)
    }

    pub fn len(&self) -> usize {
        self.ciphers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphers.is_empty()
    }

    /// Static descriptors ordered by slug.
    pub fn descriptors(&self) -> Vec<&CipherDescriptor> {
        let mut all: Vec<_> = self.ciphers.values().collect();
        all.sort_by(|a, b| a.slug().cmp(b.slug()));
        all
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.descriptors().into_iter().map(|d| d.slug()).collect()
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::builtin);

/// The process-wide built-in registry.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Static table first, then the dynamic resolver.
pub fn lookup(slug: &str) -> Option<CipherDescriptor> {
    if let Some(descriptor) = REGISTRY.get(slug) {
        return Some(descriptor.clone());
    }
    dynamic::resolve(slug)
}

pub fn exists(slug: &str) -> bool {
    lookup(slug).is_some()
}

pub fn encrypt(slug: &str, text: &str, params: &Params) -> Result<String> {
    let descriptor = lookup(slug).ok_or_else(|| CipherError::UnknownCipher(slug.to_string()))?;
    debug!(slug, direction = "encrypt", len = text.len(), "dispatching cipher");
    descriptor.encrypt(text, params)
}

pub fn decrypt(slug: &str, text: &str, params: &Params) -> Result<String> {
    let descriptor = lookup(slug).ok_or_else(|| CipherError::UnknownCipher(slug.to_string()))?;
    debug!(slug, direction = "decrypt", len = text.len(), "dispatching cipher");
    descriptor.decrypt(text, params)
}
