use std::sync::Arc;

use rt_util::symbol::{Symbol, TAG_FUNCTION, TAG_LIST, TAG_MAP, TAG_POINTER, TAG_VALUE};

use crate::traits::{Attribute, FunctionTrait, ListTrait, MapTrait, PointerAttr, ValueTrait};

/// One trait record in a value's attribute chain.
///
/// Design note #9 recommends a tagged variant for the four well-known
/// traits, with an overflow case for library-defined extensions — a tag
/// match covers the hot path (equality, list index, map find all start by
/// comparing the expected trait's tag) and only extension traits pay for a
/// dynamic dispatch.
#[derive(Debug, Clone)]
pub enum AttrKind {
    Value(Arc<dyn ValueTrait>),
    List(Arc<dyn ListTrait>),
    Map(Arc<dyn MapTrait>),
    Pointer(Arc<PointerAttr>),
    Function(Arc<dyn FunctionTrait>),
    Extension(Arc<dyn Attribute>),
}

impl AttrKind {
    pub fn tag(&self) -> Symbol {
        match self {
            AttrKind::Value(_) => TAG_VALUE,
            AttrKind::List(_) => TAG_LIST,
            AttrKind::Map(_) => TAG_MAP,
            AttrKind::Pointer(_) => TAG_POINTER,
            AttrKind::Function(_) => TAG_FUNCTION,
            AttrKind::Extension(a) => a.tag(),
        }
    }
}

/// A node in the singly-linked attribute chain. Chain nodes are immutable
/// once published: `next` is set at construction and never mutated.
#[derive(Debug, Clone)]
pub struct AttrNode {
    pub kind: AttrKind,
    pub next: Option<Arc<AttrNode>>,
}

impl AttrNode {
    pub fn new(kind: AttrKind, next: Option<Arc<AttrNode>>) -> Arc<Self> {
        Arc::new(Self { kind, next })
    }

    /// Linear walk for a trait of the given tag. Expected chain length is
    /// 1-4, so this never needs to be more than a simple loop.
    pub fn find(&self, tag: Symbol) -> Option<&AttrKind> {
        let mut cur = self;
        loop {
            if cur.kind.tag() == tag {
                return Some(&cur.kind);
            }
            match &cur.next {
                Some(n) => cur = n,
                None => return None,
            }
        }
    }

    pub fn find_value(&self) -> Option<&Arc<dyn ValueTrait>> {
        match self.find(TAG_VALUE) {
            Some(AttrKind::Value(v)) => Some(v),
            _ => None,
        }
    }

    pub fn find_list(&self) -> Option<&Arc<dyn ListTrait>> {
        match self.find(TAG_LIST) {
            Some(AttrKind::List(l)) => Some(l),
            _ => None,
        }
    }

    pub fn find_map(&self) -> Option<&Arc<dyn MapTrait>> {
        match self.find(TAG_MAP) {
            Some(AttrKind::Map(m)) => Some(m),
            _ => None,
        }
    }

    pub fn find_pointer(&self) -> Option<&Arc<PointerAttr>> {
        match self.find(TAG_POINTER) {
            Some(AttrKind::Pointer(p)) => Some(p),
            _ => None,
        }
    }

    pub fn find_function(&self) -> Option<&Arc<dyn FunctionTrait>> {
        match self.find(TAG_FUNCTION) {
            Some(AttrKind::Function(f)) => Some(f),
            _ => None,
        }
    }

    pub fn find_extension(&self, tag: Symbol) -> Option<&Arc<dyn Attribute>> {
        match self.find(tag) {
            Some(AttrKind::Extension(a)) => Some(a),
            _ => None,
        }
    }
}
