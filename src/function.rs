//! Tint-transform function interface.
//!
//! Separation and DeviceN color spaces push their colorant values through
//! a PDF function object to obtain components of the alternate space.
//! Evaluating PDF functions is the surrounding renderer's job; this module
//! only defines the capability the color-space engine consumes.

use crate::error::Result;
use crate::model::Object;

/// A tint transform: maps the colorant values of a Separation or DeviceN
/// color space to component values of its alternate space.
///
/// The bulk conversion path may evaluate the function from multiple
/// threads over disjoint pixels, hence the `Send + Sync` bound.
pub trait TintFunction: Send + Sync {
    /// Evaluate the function. `src` holds one value per colorant; `dest`
    /// has room for one value per component of the alternate space.
    fn transform(&self, src: &[f32], dest: &mut [f32]);
}

impl<F> TintFunction for F
where
    F: Fn(&[f32], &mut [f32]) + Send + Sync,
{
    fn transform(&self, src: &[f32], dest: &mut [f32]) {
        self(src, dest)
    }
}

/// Builds a [`TintFunction`] from a PDF function object.
pub trait FunctionFactory {
    fn create(&self, obj: &Object) -> Result<Box<dyn TintFunction>>;
}
