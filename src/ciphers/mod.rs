//! The cipher function library, grouped by family.
//!
//! Every family exposes plain typed functions plus a `register` hook that
//! adds its catalog entries to a [`Registry`].

pub mod arithmetic;
pub mod encoding;
pub mod polyalphabetic;
pub mod sequence;
pub mod shift;
pub mod substitution;
pub mod transposition;

use crate::error::Result;
use crate::params::Params;
use crate::registry::Registry;

pub(crate) fn register_all(reg: &mut Registry) {
    shift::register(reg);
    arithmetic::register(reg);
    polyalphabetic::register(reg);
    substitution::register(reg);
    transposition::register(reg);
    encoding::register(reg);
    sequence::register(reg);
}

/// Adapts a parameterless, infallible function to a cipher transform.
pub(crate) fn plain(
    f: fn(&str) -> String,
) -> impl Fn(&str, &Params) -> Result<String> + Send + Sync + 'static {
    move |text, _| Ok(f(text))
}
