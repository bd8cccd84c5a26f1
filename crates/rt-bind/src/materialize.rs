//! Materialization (§4.6): turns a successful binding plus a fully-known
//! parameter array into the argument array a call actually receives.

use rt_util::error::UserError;
use rt_value::Value;

use crate::bind::{Binding, BoundArg};
use crate::param::Param;
use crate::spec::FunctionSpec;

/// Produces one value per argument. Every parameter referenced by `binding`
/// must be [`Param::Static`] or [`Param::Spread`] — a [`Param::Dynamic`]
/// entry at this point is a caller error, not a binding outcome.
pub fn materialize(spec: &FunctionSpec, binding: &Binding, params: &[Param]) -> Result<Vec<Value>, UserError> {
    let mut out = Vec::with_capacity(spec.args.len());
    for bound in &binding.args {
        let value = match bound {
            BoundArg::Implicit(v) => v.clone(),
            BoundArg::Parameter(i) => params[*i]
                .static_value()
                .ok_or_else(|| UserError::argument_binding("parameter value not known at materialization time"))?
                .clone(),
            BoundArg::Collect { start, count } => collect(&params[*start..*start + *count])?,
        };
        out.push(value);
    }
    Ok(out)
}

fn collect(params: &[Param]) -> Result<Value, UserError> {
    let mut acc = rt_list::empty();
    for p in params {
        acc = match p {
            Param::Static(v) => acc
                .list_of()
                .map_err(|e| UserError::argument_binding(e.to_string()))?
                .append(v.clone()),
            Param::Spread(list_v) => {
                let list = acc.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
                list.concat(list_v)?
            }
            Param::Dynamic => {
                return Err(UserError::argument_binding("dynamic parameter in a variadic collection"))
            }
        };
    }
    Ok(acc)
}
