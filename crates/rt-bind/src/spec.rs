//! Function specifications: argument binding kinds, validity rules, and
//! native-type marshal descriptors (§4.6, §6).

use rt_util::error::FormatError;
use rt_util::symbol::Symbol;
use rt_value::traits::PointerAttr;
use rt_value::Value;

/// How a single argument gets its value at call time.
#[derive(Debug, Clone)]
pub enum BindingKind {
    /// Always this value; never consumes a parameter.
    Implicit(Value),
    /// Mandatory, bound by absolute position.
    Pos,
    /// Like `Pos`, but the bound parameter's value must be static and its
    /// string form empty. A dynamic or non-empty parameter makes binding
    /// `impossible` rather than merely `unknown`; a spread parameter still
    /// yields `unpack`.
    Empty,
    /// Optional, bound by position; defaults to the given value.
    PosDefault(Value),
    /// Zero or more parameters packed into one list argument.
    Varargs,
    /// Mandatory, bound by a name parameter followed by a value parameter.
    Named(Symbol),
    /// Like `Named`, but optional with the given default.
    NamedDefault(Symbol, Value),
    /// A named argument that takes no value parameter: bound true if its
    /// name is present, false otherwise.
    Bool(Symbol),
}

impl BindingKind {
    /// `true` for every kind except `Implicit` and `Pos` — the shapes that
    /// aren't simply "the next position" (§4.6: "variable-shaped").
    /// `Empty` is grouped with `Pos` here: both are resolved purely by
    /// absolute position in the same left/right greedy passes, so treating
    /// it as fixed-shape is what makes it participate in that matching at
    /// all (spec.md's own validity-rule enumeration never mentions `empty`
    /// explicitly either way).
    fn is_variable_shaped(&self) -> bool {
        !matches!(self, BindingKind::Implicit(_) | BindingKind::Pos | BindingKind::Empty)
    }

    fn is_named(&self) -> bool {
        matches!(
            self,
            BindingKind::Named(_) | BindingKind::NamedDefault(_, _) | BindingKind::Bool(_)
        )
    }

    fn name(&self) -> Option<Symbol> {
        match self {
            BindingKind::Named(n) | BindingKind::NamedDefault(n, _) | BindingKind::Bool(n) => Some(*n),
            _ => None,
        }
    }
}

/// A native marshalling type, as recognized by the `c`/`this`/`msstd`
/// calling conventions. The `ava` convention never carries these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarshalType {
    Void,
    Byte,
    Short,
    Int,
    Long,
    LLong,
    UByte,
    UShort,
    UInt,
    ULong,
    ULLong,
    AvaSByte,
    AvaSShort,
    AvaSInt,
    AvaSLong,
    AvaUByte,
    AvaUShort,
    AvaUInt,
    AvaULong,
    AvaInteger,
    AvaReal,
    Size,
    Float,
    Double,
    LDouble,
    StringType,
    /// A pointer of the given native type, spelled `tag*` (mutable) or
    /// `tag&` (const) — reuses [`PointerAttr`]'s own spelling.
    Pointer(PointerAttr),
}

impl MarshalType {
    pub fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "void" => MarshalType::Void,
            "byte" => MarshalType::Byte,
            "short" => MarshalType::Short,
            "int" => MarshalType::Int,
            "long" => MarshalType::Long,
            "llong" => MarshalType::LLong,
            "ubyte" => MarshalType::UByte,
            "ushort" => MarshalType::UShort,
            "uint" => MarshalType::UInt,
            "ulong" => MarshalType::ULong,
            "ullong" => MarshalType::ULLong,
            "ava_sbyte" => MarshalType::AvaSByte,
            "ava_sshort" => MarshalType::AvaSShort,
            "ava_sint" => MarshalType::AvaSInt,
            "ava_slong" => MarshalType::AvaSLong,
            "ava_ubyte" => MarshalType::AvaUByte,
            "ava_ushort" => MarshalType::AvaUShort,
            "ava_uint" => MarshalType::AvaUInt,
            "ava_ulong" => MarshalType::AvaULong,
            "ava_integer" => MarshalType::AvaInteger,
            "ava_real" => MarshalType::AvaReal,
            "size" => MarshalType::Size,
            "float" => MarshalType::Float,
            "double" => MarshalType::Double,
            "ldouble" => MarshalType::LDouble,
            "string" => MarshalType::StringType,
            _ => {
                if let Some(tag) = token.strip_suffix('*') {
                    return Some(MarshalType::Pointer(PointerAttr::new(Symbol::intern(tag), true)));
                }
                if let Some(tag) = token.strip_suffix('&') {
                    return Some(MarshalType::Pointer(PointerAttr::new(Symbol::intern(tag), false)));
                }
                return None;
            }
        })
    }

    pub fn spelling(&self) -> String {
        match self {
            MarshalType::Void => "void".to_string(),
            MarshalType::Byte => "byte".to_string(),
            MarshalType::Short => "short".to_string(),
            MarshalType::Int => "int".to_string(),
            MarshalType::Long => "long".to_string(),
            MarshalType::LLong => "llong".to_string(),
            MarshalType::UByte => "ubyte".to_string(),
            MarshalType::UShort => "ushort".to_string(),
            MarshalType::UInt => "uint".to_string(),
            MarshalType::ULong => "ulong".to_string(),
            MarshalType::ULLong => "ullong".to_string(),
            MarshalType::AvaSByte => "ava_sbyte".to_string(),
            MarshalType::AvaSShort => "ava_sshort".to_string(),
            MarshalType::AvaSInt => "ava_sint".to_string(),
            MarshalType::AvaSLong => "ava_slong".to_string(),
            MarshalType::AvaUByte => "ava_ubyte".to_string(),
            MarshalType::AvaUShort => "ava_ushort".to_string(),
            MarshalType::AvaUInt => "ava_uint".to_string(),
            MarshalType::AvaULong => "ava_ulong".to_string(),
            MarshalType::AvaInteger => "ava_integer".to_string(),
            MarshalType::AvaReal => "ava_real".to_string(),
            MarshalType::Size => "size".to_string(),
            MarshalType::Float => "float".to_string(),
            MarshalType::Double => "double".to_string(),
            MarshalType::LDouble => "ldouble".to_string(),
            MarshalType::StringType => "string".to_string(),
            MarshalType::Pointer(p) => p.descriptor(),
        }
    }
}

/// One argument's marshal descriptor (native conventions only) plus its
/// binding kind.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub marshal: Option<MarshalType>,
    pub binding: BindingKind,
}

/// A fully-specified callable: address, calling convention, optional
/// return marshal descriptor, and the argument specifications. Validity
/// (contiguity of variable-shaped arguments, no variable-shaped argument
/// after `varargs`, distinct names, at least one non-implicit argument) is
/// checked once, at construction.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    pub address: u64,
    pub convention: Symbol,
    pub return_marshal: Option<MarshalType>,
    pub args: Vec<ArgSpec>,
}

impl FunctionSpec {
    pub fn new(
        address: u64,
        convention: Symbol,
        return_marshal: Option<MarshalType>,
        args: Vec<ArgSpec>,
    ) -> Result<Self, FormatError> {
        validate(&args)?;
        Ok(Self { address, convention, return_marshal, args })
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

fn validate(args: &[ArgSpec]) -> Result<(), FormatError> {
    let mut seen_var_shape = false;
    let mut seen_fixed_after_var = false;
    let mut seen_varargs = false;
    let mut only_implicit = true;
    let mut seen_names: Vec<Symbol> = Vec::new();

    for a in args {
        let var_shape = a.binding.is_variable_shaped();

        if seen_varargs && var_shape {
            return Err(FormatError::InvalidFunction(
                "a variable-shaped argument follows a varargs argument".to_string(),
            ));
        }
        if seen_fixed_after_var && var_shape {
            return Err(FormatError::InvalidFunction(
                "variable-shaped arguments are not contiguous".to_string(),
            ));
        }
        if let Some(name) = a.binding.name() {
            if seen_names.contains(&name) {
                return Err(FormatError::InvalidFunction(format!(
                    "duplicate named argument: {}",
                    name.as_str()
                )));
            }
            seen_names.push(name);
        }

        seen_var_shape |= var_shape;
        seen_fixed_after_var |= !var_shape && seen_var_shape;
        seen_varargs |= matches!(a.binding, BindingKind::Varargs);
        only_implicit &= matches!(a.binding, BindingKind::Implicit(_));
    }

    if only_implicit {
        return Err(FormatError::InvalidFunction(
            "function has no explicit arguments".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn is_named(kind: &BindingKind) -> bool {
    kind.is_named()
}

pub(crate) fn named_name(kind: &BindingKind) -> Option<Symbol> {
    kind.name()
}
