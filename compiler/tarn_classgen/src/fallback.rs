//! Fallback seam.

use tarn_ir::ExprId;
use tarn_types::AccessFlags;

use crate::context::LowerCx;
use crate::error::Result;

/// The closure-object lowering strategy used for ineligible lambdas.
///
/// Implemented by the general-purpose closure writer; this crate only
/// decides when to delegate. The expression and access flags are handed
/// over unchanged.
pub trait FallbackLowering {
    fn lower_closure(
        &mut self,
        cx: &mut LowerCx<'_>,
        expr: ExprId,
        access: AccessFlags,
    ) -> Result<()>;
}
