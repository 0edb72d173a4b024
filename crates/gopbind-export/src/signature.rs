//! Signature analysis.
//!
//! Splits a function signature into the pieces adapter synthesis needs:
//! fixed parameters, the variadic tail element, results and the receiver.

use gopbind_core::{Signature, TypeDescriptor};

/// How a method receives its receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverInfo {
    None,
    Value(String),
    Pointer(String),
}

/// A signature broken down for adapter synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedSignature<'a> {
    /// Parameters before the variadic tail (all parameters when not variadic).
    pub params: Vec<&'a TypeDescriptor>,
    /// Element type of the variadic tail.
    pub tail: Option<&'a TypeDescriptor>,
    pub results: Vec<&'a TypeDescriptor>,
    pub receiver: ReceiverInfo,
}

impl AnalyzedSignature<'_> {
    /// Argument slot of the first parameter. The receiver, if any, takes slot 0.
    pub fn arg_base(&self) -> usize {
        match self.receiver {
            ReceiverInfo::None => 0,
            ReceiverInfo::Value(_) | ReceiverInfo::Pointer(_) => 1,
        }
    }

    /// Number of argument slots before the variadic tail, receiver included.
    pub fn fixed_arity(&self) -> usize {
        self.arg_base() + self.params.len()
    }

    pub fn is_variadic(&self) -> bool {
        self.tail.is_some()
    }
}

/// Analyze a signature.
pub fn analyze(sig: &Signature) -> AnalyzedSignature<'_> {
    let mut params: Vec<&TypeDescriptor> = sig.params.iter().map(|p| &p.ty).collect();
    let tail = if sig.variadic {
        params.pop().map(|last| match last {
            TypeDescriptor::Slice { elem } => elem.as_ref(),
            other => other,
        })
    } else {
        None
    };

    let receiver = match &sig.receiver {
        None => ReceiverInfo::None,
        Some(recv) => match &recv.ty {
            TypeDescriptor::Pointer { elem } => match elem.as_ref() {
                TypeDescriptor::Named(named) => ReceiverInfo::Pointer(named.name.clone()),
                _ => ReceiverInfo::None,
            },
            TypeDescriptor::Named(named) => ReceiverInfo::Value(named.name.clone()),
            _ => ReceiverInfo::None,
        },
    };

    AnalyzedSignature {
        params,
        tail,
        results: sig.results.iter().map(|r| &r.ty).collect(),
        receiver,
    }
}
