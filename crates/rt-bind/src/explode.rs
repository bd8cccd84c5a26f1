//! Recovery from [`BindStatus::Unpack`](crate::BindStatus::Unpack): flatten
//! spread parameters into static parameters and retry binding.

use crate::param::Param;

/// Replaces each [`Param::Spread`] with its list elements as
/// [`Param::Static`] parameters. Terminates because every spread produces a
/// finite list and the output is never itself a spread.
pub fn explode(params: Vec<Param>) -> Vec<Param> {
    let mut out = Vec::with_capacity(params.len());
    for p in params {
        match p {
            Param::Spread(list_v) => {
                let list = list_v.list_of().expect("spread parameter must be a list value");
                for i in 0..list.len() {
                    out.push(Param::Static(list.index(i).expect("within len")));
                }
            }
            other => out.push(other),
        }
    }
    out
}
