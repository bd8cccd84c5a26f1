//! The function string form (§6): a list of address, calling-convention
//! tag, optional return marshal descriptor, and one sublist per argument.

use rt_util::error::FormatError;
use rt_util::symbol::{Symbol, CC_AVA, CC_C, CC_MSSTD, CC_THIS};
use rt_value::convert::{parse_integer, value_of_integer};
use rt_value::Value;

use crate::spec::{ArgSpec, BindingKind, FunctionSpec, MarshalType};

/// Every value embedded in a binding clause (an `implicit`/`pos_default`/
/// `named_default` default, or a named argument's name) round-trips as a
/// plain string value — the string form carries no further type tag, the
/// same way every other value's canonical form is just a string until a
/// caller asks for a more specific view of it.
fn leaf_value(token: &str) -> Value {
    rt_string::of_str(token)
}

fn convention_of(token: &str) -> Result<Symbol, FormatError> {
    match token {
        "ava" => Ok(CC_AVA),
        "c" => Ok(CC_C),
        "msstd" => Ok(CC_MSSTD),
        "this" => Ok(CC_THIS),
        other => Err(FormatError::InvalidFunction(format!("unknown calling convention: {other}"))),
    }
}

fn convention_spelling(cc: Symbol) -> &'static str {
    match cc {
        CC_AVA => "ava",
        CC_C => "c",
        CC_MSSTD => "msstd",
        CC_THIS => "this",
        _ => "ava",
    }
}

pub fn parse(input: &str) -> Result<FunctionSpec, FormatError> {
    let outer = rt_list::parse(input)?;
    let elements = outer
        .list_of()
        .map_err(|_| FormatError::InvalidFunction(input.to_string()))?;
    if elements.len() < 2 {
        return Err(FormatError::InvalidFunction(input.to_string()));
    }

    let address_str = elements.index(0).expect("checked len").to_string();
    let address = parse_integer(&address_str)? as u64;
    let convention = convention_of(&elements.index(1).expect("checked len").to_string())?;
    let native = convention != CC_AVA;

    let mut next = 2usize;
    let return_marshal = if native {
        let tok = elements
            .index(next)
            .map_err(|_| FormatError::InvalidFunction(input.to_string()))?
            .to_string();
        next += 1;
        Some(
            MarshalType::parse(&tok)
                .ok_or_else(|| FormatError::InvalidFunction(format!("unknown marshal type: {tok}")))?,
        )
    } else {
        None
    };

    let mut args = Vec::with_capacity(elements.len().saturating_sub(next));
    for i in next..elements.len() {
        let arg_elem = elements.index(i).expect("within len");
        let inner = rt_list::parse(&arg_elem.to_string())?;
        let inner_list = inner
            .list_of()
            .map_err(|_| FormatError::InvalidFunction(input.to_string()))?;
        let mut tokens: Vec<String> = (0..inner_list.len())
            .map(|j| inner_list.index(j).expect("within len").to_string())
            .collect();

        let marshal = if native {
            if tokens.is_empty() {
                return Err(FormatError::InvalidFunction(input.to_string()));
            }
            let tok = tokens.remove(0);
            Some(
                MarshalType::parse(&tok)
                    .ok_or_else(|| FormatError::InvalidFunction(format!("unknown marshal type: {tok}")))?,
            )
        } else {
            None
        };

        let binding = parse_binding_clause(&tokens)?;
        args.push(ArgSpec { marshal, binding });
    }

    FunctionSpec::new(address, convention, return_marshal, args)
}

fn parse_binding_clause(tokens: &[String]) -> Result<BindingKind, FormatError> {
    let invalid = || FormatError::InvalidFunction(format!("invalid binding clause: {tokens:?}"));
    match tokens {
        [kw] if kw == "pos" => Ok(BindingKind::Pos),
        [kw] if kw == "empty" => Ok(BindingKind::Empty),
        [kw] if kw == "varargs" => Ok(BindingKind::Varargs),
        [kw, v] if kw == "pos" => Ok(BindingKind::PosDefault(leaf_value(v))),
        [kw, name] if kw == "named" => Ok(BindingKind::Named(Symbol::intern(name))),
        [kw, name] if kw == "bool" => Ok(BindingKind::Bool(Symbol::intern(name))),
        [kw, v] if kw == "implicit" => Ok(BindingKind::Implicit(leaf_value(v))),
        [kw, name, v] if kw == "named" => Ok(BindingKind::NamedDefault(Symbol::intern(name), leaf_value(v))),
        _ => Err(invalid()),
    }
}

fn binding_clause_tokens(binding: &BindingKind) -> Vec<Value> {
    match binding {
        BindingKind::Pos => vec![rt_string::of_str("pos")],
        BindingKind::Empty => vec![rt_string::of_str("empty")],
        BindingKind::Varargs => vec![rt_string::of_str("varargs")],
        BindingKind::PosDefault(v) => vec![rt_string::of_str("pos"), v.clone()],
        BindingKind::Named(n) => vec![rt_string::of_str("named"), rt_string::of_str(n.as_str())],
        BindingKind::NamedDefault(n, v) => {
            vec![rt_string::of_str("named"), rt_string::of_str(n.as_str()), v.clone()]
        }
        BindingKind::Bool(n) => vec![rt_string::of_str("bool"), rt_string::of_str(n.as_str())],
        BindingKind::Implicit(v) => vec![rt_string::of_str("implicit"), v.clone()],
    }
}

pub fn format(spec: &FunctionSpec) -> String {
    let native = spec.convention != CC_AVA;
    let mut top = vec![value_of_integer(spec.address as i64), rt_string::of_str(convention_spelling(spec.convention))];

    if native {
        let rt = spec
            .return_marshal
            .as_ref()
            .expect("native calling convention carries a return marshal descriptor");
        top.push(rt_string::of_str(&rt.spelling()));
    }

    for a in &spec.args {
        let mut tokens = Vec::new();
        if native {
            let m = a
                .marshal
                .as_ref()
                .expect("native calling convention carries per-argument marshal descriptors");
            tokens.push(rt_string::of_str(&m.spelling()));
        }
        tokens.extend(binding_clause_tokens(&a.binding));
        top.push(rt_list::of_values(tokens));
    }

    rt_list::of_values(top).to_string()
}
