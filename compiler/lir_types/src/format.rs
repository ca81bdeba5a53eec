//! Human-readable type rendering for diagnostics and dumps.
//!
//! Cycles are printed as up-references: `\N` names the type `N` levels up
//! the rendering stack, so `{ \2* }` is a struct holding a pointer to itself.

use std::fmt::{self, Write};

use crate::kinds::{FunctionType, TypeKind};
use crate::{Idx, ParamAttrs, TypeContext};

/// `Display` adapter returned by [`TypeContext::display`].
pub struct TypeDisplay<'ctx> {
    ctx: &'ctx TypeContext,
    idx: Idx,
}

impl TypeContext {
    /// Render `idx` with `{}`.
    pub fn display(&self, idx: Idx) -> TypeDisplay<'_> {
        TypeDisplay { ctx: self, idx }
    }

    /// Print `idx` to stderr.
    pub fn dump(&self, idx: Idx) {
        eprintln!("{}", self.display(idx));
    }

    fn write_type(&self, out: &mut impl Write, idx: Idx, stack: &mut Vec<Idx>) -> fmt::Result {
        let idx = self.resolve(idx);
        if let Some(pos) = stack.iter().rposition(|&seen| seen == idx) {
            return write!(out, "\\{}", stack.len() - pos);
        }

        stack.push(idx);
        let result = match self.kind(idx) {
            TypeKind::Primitive(tag) => out.write_str(tag.name()),
            TypeKind::Integer(int) => write!(out, "i{}", int.bit_width()),
            TypeKind::Opaque(_) => out.write_str("opaque"),
            TypeKind::Pointer(ptr) => {
                self.write_type(out, ptr.element_type(), stack)?;
                out.write_char('*')
            }
            TypeKind::Array(array) => {
                write!(out, "[{} x ", array.num_elements())?;
                self.write_type(out, array.element_type(), stack)?;
                out.write_char(']')
            }
            TypeKind::Vector(vector) => {
                write!(out, "<{} x ", vector.num_elements())?;
                self.write_type(out, vector.element_type(), stack)?;
                out.write_char('>')
            }
            TypeKind::Struct(st) => {
                if st.is_packed() {
                    out.write_char('<')?;
                }
                out.write_char('{')?;
                for (i, &field) in st.elements().iter().enumerate() {
                    out.write_str(if i == 0 { " " } else { ", " })?;
                    self.write_type(out, field, stack)?;
                }
                out.write_str(if st.num_elements() == 0 { "}" } else { " }" })?;
                if st.is_packed() {
                    out.write_char('>')?;
                }
                Ok(())
            }
            TypeKind::Function(func) => self.write_function(out, func, stack),
        };
        stack.pop();
        result
    }

    fn write_function(
        &self,
        out: &mut impl Write,
        func: FunctionType<'_>,
        stack: &mut Vec<Idx>,
    ) -> fmt::Result {
        self.write_type(out, func.return_type(), stack)?;
        out.write_str(" (")?;
        for (i, &param) in func.params().iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            self.write_type(out, param, stack)?;
            write_attrs(out, func.param_attrs(i + 1))?;
        }
        if func.is_var_arg() {
            out.write_str(if func.num_params() == 0 { "..." } else { ", ..." })?;
        }
        out.write_char(')')?;
        write_attrs(out, func.param_attrs(0))
    }
}

fn write_attrs(out: &mut impl Write, attrs: ParamAttrs) -> fmt::Result {
    if attrs.is_empty() {
        return Ok(());
    }
    write!(out, " {}", attrs.text().trim_end())
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ctx.write_type(f, self.idx, &mut Vec::new())
    }
}

impl fmt::Debug for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} = {self}", self.idx)
    }
}
