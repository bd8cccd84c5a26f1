//! Partial application (§4.6): used to implement closures over a function
//! specification.

use rt_value::Value;

use crate::spec::{ArgSpec, BindingKind, FunctionSpec};

/// Replaces the first `values.len()` non-implicit argument specifications
/// with `implicit` bindings carrying the given values, in order. The rest
/// of the specification, including validity, is left untouched — this
/// bypasses normal parameter binding, so a spec that no longer has a
/// non-implicit argument after this call is not re-checked.
pub fn partial_apply(spec: &FunctionSpec, values: &[Value]) -> FunctionSpec {
    let mut args: Vec<ArgSpec> = spec.args.clone();
    let mut values = values.iter();

    for a in args.iter_mut() {
        if matches!(a.binding, BindingKind::Implicit(_)) {
            continue;
        }
        let Some(v) = values.next() else { break };
        a.binding = BindingKind::Implicit(v.clone());
    }

    FunctionSpec {
        address: spec.address,
        convention: spec.convention,
        return_marshal: spec.return_marshal.clone(),
        args,
    }
}
