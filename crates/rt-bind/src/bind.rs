//! The binding algorithm (§4.6): matches call-site parameters against a
//! function's argument specifications.

use rt_value::Value;

use crate::param::Param;
use crate::spec::{named_name, BindingKind, FunctionSpec};

/// How one argument was bound, once binding succeeds.
#[derive(Debug, Clone)]
pub enum BoundArg {
    /// Always this value — spec-declared implicit, a matched `bool` (true),
    /// or a resolved default (`pos_default`, `named_default`, unmatched
    /// `bool` false, unmatched `varargs` empty list).
    Implicit(Value),
    /// The single parameter at this index.
    Parameter(usize),
    /// A `varargs` collection spanning `params[start..start+count]`.
    Collect { start: usize, count: usize },
}

/// A successful binding: one [`BoundArg`] per argument, in argument order.
#[derive(Debug, Clone)]
pub struct Binding {
    pub args: Vec<BoundArg>,
}

/// The result of [`bind`].
#[derive(Debug, Clone)]
pub enum BindStatus {
    Bound(Binding),
    /// Insufficient information to decide — only arises from a `dynamic`
    /// parameter at a named-argument decision point.
    Unknown,
    /// Binding is known to be impossible; carries a diagnostic message.
    Impossible(String),
    /// A spread parameter spans non-variadic arguments; the caller must
    /// [`explode`](crate::explode) the parameters and retry.
    Unpack,
}

fn is_empty_value(v: &Value) -> bool {
    v.to_string().is_empty()
}

/// Runs the six-step binding algorithm from spec.md §4.6 against one
/// function specification and one parameter list.
pub fn bind(spec: &FunctionSpec, params: &[Param]) -> BindStatus {
    let n = spec.args.len();
    let mut consumed = vec![false; n];
    let mut bound: Vec<Option<BoundArg>> = vec![None; n];

    // Step 1: implicit arguments never consume a parameter.
    for (i, a) in spec.args.iter().enumerate() {
        if let BindingKind::Implicit(v) = &a.binding {
            bound[i] = Some(BoundArg::Implicit(v.clone()));
            consumed[i] = true;
        }
    }

    let mut parm = 0usize;
    let mut parm_limit = params.len();

    // Step 2: consecutive pos/empty arguments, left to right.
    {
        let mut arg = 0usize;
        while arg < n && parm < parm_limit {
            if consumed[arg] {
                arg += 1;
                continue;
            }
            match &spec.args[arg].binding {
                BindingKind::Pos => {
                    if params[parm].is_spread() {
                        return BindStatus::Unpack;
                    }
                    bound[arg] = Some(BoundArg::Parameter(parm));
                    consumed[arg] = true;
                    arg += 1;
                    parm += 1;
                }
                BindingKind::Empty => {
                    match check_empty(&params[parm]) {
                        Ok(()) => {
                            bound[arg] = Some(BoundArg::Parameter(parm));
                            consumed[arg] = true;
                            arg += 1;
                            parm += 1;
                        }
                        Err(status) => return status,
                    }
                }
                _ => break,
            }
        }
    }

    // Step 3: consecutive pos/empty arguments, right to left.
    {
        for arg in (0..n).rev() {
            if parm >= parm_limit {
                break;
            }
            if consumed[arg] {
                continue;
            }
            match &spec.args[arg].binding {
                BindingKind::Pos => {
                    if params[parm_limit - 1].is_spread() {
                        return BindStatus::Unpack;
                    }
                    bound[arg] = Some(BoundArg::Parameter(parm_limit - 1));
                    consumed[arg] = true;
                    parm_limit -= 1;
                }
                BindingKind::Empty => match check_empty(&params[parm_limit - 1]) {
                    Ok(()) => {
                        bound[arg] = Some(BoundArg::Parameter(parm_limit - 1));
                        consumed[arg] = true;
                        parm_limit -= 1;
                    }
                    Err(status) => return status,
                },
                _ => break,
            }
        }
    }

    // Step 4: the contiguous variable-shaped middle region.
    {
        let mut arg = 0usize;
        while arg < n && parm < parm_limit {
            if consumed[arg] {
                arg += 1;
                continue;
            }
            match &spec.args[arg].binding {
                BindingKind::Named(_) | BindingKind::NamedDefault(_, _) | BindingKind::Bool(_) => {
                    if params[parm].is_spread() {
                        return BindStatus::Unpack;
                    }
                    if params[parm].is_dynamic() {
                        return BindStatus::Unknown;
                    }
                    let target = params[parm].static_value().expect("checked static above").to_string();

                    let mut other = arg;
                    let mut matched = false;
                    while other < n && is_named(&spec.args[other].binding) {
                        if !consumed[other] && named_name(&spec.args[other].binding).map(|s| s.as_str()) == Some(target.as_str()) {
                            match &spec.args[other].binding {
                                BindingKind::Bool(_) => {
                                    bound[other] = Some(BoundArg::Implicit(rt_string::of_str("true")));
                                    consumed[other] = true;
                                    parm += 1;
                                }
                                _ => {
                                    if parm + 1 >= parm_limit {
                                        return BindStatus::Impossible(format!(
                                            "missing value for named parameter: {target}"
                                        ));
                                    }
                                    if params[parm + 1].is_spread() {
                                        return BindStatus::Unpack;
                                    }
                                    bound[other] = Some(BoundArg::Parameter(parm + 1));
                                    consumed[other] = true;
                                    parm += 2;
                                }
                            }
                            matched = true;
                            break;
                        }
                        other += 1;
                    }

                    if !matched {
                        return BindStatus::Impossible(format!("no match for named parameter: {target}"));
                    }
                    // Stay on the same `arg`: more than one named argument
                    // may need to be resolved from this anchor.
                }
                BindingKind::PosDefault(_) => {
                    bound[arg] = Some(BoundArg::Parameter(parm));
                    consumed[arg] = true;
                    parm += 1;
                    arg += 1;
                }
                BindingKind::Varargs => {
                    bound[arg] = Some(BoundArg::Collect { start: parm, count: parm_limit - parm });
                    consumed[arg] = true;
                    parm = parm_limit;
                    arg += 1;
                }
                _ => unreachable!("validity rules guarantee only variable-shaped args remain here"),
            }
        }
    }

    if parm < parm_limit {
        return BindStatus::Impossible(format!(
            "too many parameters to function; {} to {} could not be bound",
            parm + 1,
            parm_limit
        ));
    }

    // Step 5: defaults for anything still unbound.
    for (i, a) in spec.args.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        bound[i] = Some(match &a.binding {
            BindingKind::PosDefault(v) | BindingKind::NamedDefault(_, v) => BoundArg::Implicit(v.clone()),
            BindingKind::Bool(_) => BoundArg::Implicit(rt_string::of_str("false")),
            BindingKind::Varargs => BoundArg::Implicit(rt_list::empty()),
            BindingKind::Named(name) => {
                return BindStatus::Impossible(format!(
                    "no parameter bound to mandatory argument: {}",
                    name.as_str()
                ))
            }
            _ => return BindStatus::Impossible(format!("no parameter bound to mandatory argument #{}", i + 1)),
        });
    }

    BindStatus::Bound(Binding {
        args: bound.into_iter().map(|b| b.expect("every argument bound by this point")).collect(),
    })
}

fn check_empty(param: &Param) -> Result<(), BindStatus> {
    if param.is_spread() {
        return Err(BindStatus::Unpack);
    }
    match param.static_value() {
        None => Err(BindStatus::Impossible(
            "an `empty` argument requires a static parameter".to_string(),
        )),
        Some(v) if !is_empty_value(v) => Err(BindStatus::Impossible(
            "an `empty` argument requires an empty parameter value".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

fn is_named(kind: &BindingKind) -> bool {
    crate::spec::is_named(kind)
}
