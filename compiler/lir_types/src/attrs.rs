//! Function parameter attributes.
//!
//! Attributes are stored per function type as an ordered list of bit sets.
//! Index 0 describes the return value; index `i` (1-based) describes
//! parameter `i - 1`.

use bitflags::bitflags;

bitflags! {
    /// Attributes of a single parameter (or of the return value).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct ParamAttrs: u16 {
        /// Zero extended before/after call.
        const ZEXT = 1;
        /// Sign extended before/after call.
        const SEXT = 1 << 1;
        /// The function does not return.
        const NO_RETURN = 1 << 2;
        /// Passed in a register.
        const IN_REG = 1 << 3;
        /// Hidden pointer to the structure being returned.
        const STRUCT_RET = 1 << 4;
    }
}

/// Attribute-to-token mapping, in rendering order.
const TOKENS: [(ParamAttrs, &str); 5] = [
    (ParamAttrs::ZEXT, "zext"),
    (ParamAttrs::SEXT, "sext"),
    (ParamAttrs::NO_RETURN, "noreturn"),
    (ParamAttrs::IN_REG, "inreg"),
    (ParamAttrs::STRUCT_RET, "sret"),
];

impl ParamAttrs {
    /// Render as assembly text: each set attribute as its token followed by
    /// a single space. The empty set renders as the empty string.
    pub fn text(self) -> String {
        let mut out = String::new();
        for (attr, token) in TOKENS {
            if self.contains(attr) {
                out.push_str(token);
                out.push(' ');
            }
        }
        out
    }
}

/// Canonical form of an attribute list used in structural keys.
///
/// Trailing empty entries carry no information and are trimmed, so a list
/// of all-empty sets is the same as no list at all.
pub(crate) fn normalize(attrs: &[ParamAttrs]) -> Box<[ParamAttrs]> {
    let len = attrs
        .iter()
        .rposition(|a| !a.is_empty())
        .map_or(0, |last| last + 1);
    attrs[..len].into()
}
