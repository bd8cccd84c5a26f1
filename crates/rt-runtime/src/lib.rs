//! The facade crate: a single dependency for embedding the value runtime,
//! wiring every component (§4.1-§4.6) to the host allocator ([`rt_alloc`])
//! and re-exporting the surface a caller needs without reaching into each
//! `rt-*` crate individually.
//!
//! None of the six core components allocate through anything but
//! [`rt_alloc::Allocator`] — `rt-value`, `rt-string`, `rt-pvec`, `rt-list`,
//! `rt-map`, and `rt-bind` are otherwise independent of each other and of
//! this crate; `rt-runtime` only adds the wiring and the combined prelude.

mod init;

pub use init::{init, runtime};
pub use rt_alloc::{AllocConfig, Allocator, FgcError};

/// Re-exports covering the operations spec.md §4 names, one glob per
/// component, so `use rt_runtime::prelude::*;` is enough to work with
/// values, strings, lists, maps, and function bindings without separately
/// depending on each `rt-*` crate.
pub mod prelude {
    pub use rt_bind::{
        bind, explode, materialize, of_spec as function_of_spec, partial_apply, value_of as function_value_of,
        ArgSpec, BindStatus, Binding, BindingKind, BoundArg, FunctionSpec, MarshalType, Param,
    };
    pub use rt_list::{
        demux as list_demux, empty as list_empty, flatten as list_flatten, group as list_group,
        interleave as list_interleave, of_values as list_of_values, parse as list_parse,
    };
    pub use rt_map::{empty as map_empty, of_pairs as map_of_pairs, parse as map_parse};
    pub use rt_pvec::PvRef;
    pub use rt_string::{
        bytes_of as string_bytes_of, concat as string_concat, escape_for_list, index as string_index,
        iterate_chunks, of_bytes as string_of_bytes, of_cstring as string_of_cstring, of_str as string_of_str,
        slice as string_slice, unescape_element, Chunks,
    };
    pub use rt_util::error::{FormatError, UserError, UserErrorClass};
    pub use rt_util::symbol::Symbol;
    pub use rt_value::convert::{
        integer_mod, integer_of, parse_integer, parse_real, real_of, value_of_integer, value_of_real,
    };
    pub use rt_value::{Cursor, Value};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_builds_and_reads_back_a_list_of_integers() {
        let list = list_of_values(vec![value_of_integer(1), value_of_integer(2), value_of_integer(3)]);
        assert_eq!(list.list_of().unwrap().len(), 3);
        assert_eq!(list.to_string(), "1 2 3");
    }

    #[test]
    fn prelude_round_trips_a_function_spec_through_its_string_form() {
        let spec = FunctionSpec::new(
            42,
            Symbol::intern("ava"),
            None,
            vec![ArgSpec { marshal: None, binding: BindingKind::Pos }],
        )
        .unwrap();
        let value = function_of_spec(spec);
        assert_eq!(value.function_of().unwrap().arity(), 1);
        let reparsed = rt_bind::parse(&value.to_string()).unwrap();
        assert_eq!(reparsed.arity(), 1);
    }
}
