//! Signature matching: does a callable accept this receiver and these
//! arguments, and at what cost?
//!
//! Members and extensions share the argument rules (arity with defaulted
//! parameters, one implicit conversion per argument). They differ in how the
//! receiver is checked:
//!
//! - a member is called on its object; a const object only reaches `const`
//!   members
//! - an extension binds the object to parameter 0, either a concrete class
//!   (same class or a base, const-correct) or a constrained placeholder that
//!   accepts any type satisfying the constraint
//!
//! Constraint checks are delegated to a caller-supplied predicate so the
//! concept evaluator can thread its recursion state through.

use extcall_core::{DataType, FunctionEntry, Param, TypeHash, primitives};
use extcall_registry::SymbolRegistry;

use crate::context::ResolutionContext;
use crate::conversion::{Conversion, ConversionKind, find_conversion};

/// A successful match with per-argument conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureMatch {
    /// The matched callable.
    pub func_hash: TypeHash,
    /// How the receiver binds to parameter 0 (extensions only).
    pub receiver_conversion: Option<Conversion>,
    /// One entry per non-receiver parameter; `None` means the default
    /// argument is used.
    pub arg_conversions: Vec<Option<Conversion>>,
    /// Sum of argument conversion costs, receiver excluded.
    pub total_cost: u32,
}

impl SignatureMatch {
    /// Number of supplied arguments matched without conversion. Defaulted
    /// parameters do not count.
    pub fn exact_count(&self) -> usize {
        self.arg_conversions
            .iter()
            .flatten()
            .filter(|conv| conv.is_exact())
            .count()
    }

    /// Receiver binding cost; zero for members.
    pub fn receiver_cost(&self) -> u32 {
        self.receiver_conversion.map(|c| c.cost).unwrap_or(0)
    }
}

/// Match call-site arguments against a parameter list.
///
/// Returns the per-parameter conversions and their total cost.
pub fn match_args(
    params: &[Param],
    args: &[DataType],
    registry: &SymbolRegistry,
) -> Option<(Vec<Option<Conversion>>, u32)> {
    let required = params.iter().filter(|p| !p.has_default).count();
    if args.len() < required || args.len() > params.len() {
        return None;
    }

    let mut conversions = Vec::with_capacity(params.len());
    let mut total_cost = 0u32;
    for (i, param) in params.iter().enumerate() {
        match args.get(i) {
            Some(arg) => {
                let conv = find_conversion(arg, &param.data_type, registry)?;
                total_cost = total_cost.saturating_add(conv.cost);
                conversions.push(Some(conv));
            }
            None => conversions.push(None),
        }
    }
    Some((conversions, total_cost))
}

/// Match a member function called on `receiver`.
pub fn match_member(
    func: &FunctionEntry,
    receiver: &DataType,
    args: &[DataType],
    registry: &SymbolRegistry,
) -> Option<SignatureMatch> {
    if !func.def.is_member() || (receiver.is_const && !func.def.is_const()) {
        return None;
    }
    let (arg_conversions, total_cost) = match_args(&func.def.params, args, registry)?;
    Some(SignatureMatch {
        func_hash: func.def.func_hash,
        receiver_conversion: None,
        arg_conversions,
        total_cost,
    })
}

/// Match `receiver` against parameter 0 of a free function.
///
/// `satisfied(constraint, type)` decides constrained parameters.
pub fn match_receiver(
    func: &FunctionEntry,
    receiver: &DataType,
    registry: &SymbolRegistry,
    satisfied: &mut dyn FnMut(TypeHash, TypeHash) -> bool,
) -> Option<Conversion> {
    let param = func.def.params.first()?.data_type;

    if param.type_hash != primitives::CONSTRAINED {
        return find_conversion(receiver, &param, registry);
    }

    if receiver.is_const && !param.is_const {
        return None;
    }
    let constraint = func.def.constraint?;
    if !satisfied(constraint, receiver.type_hash) {
        return None;
    }
    Some(if param.is_const && !receiver.is_const {
        Conversion {
            kind: ConversionKind::ConstAddition,
            cost: Conversion::COST_CONST_ADDITION,
        }
    } else {
        Conversion::identity()
    })
}

/// Match a free function called as `f(receiver, args...)`.
///
/// Used for extension candidates (receiver = call-site object) and for
/// free-mode constraint requirements (receiver = type under test).
pub fn match_bound_call(
    func: &FunctionEntry,
    receiver: &DataType,
    args: &[DataType],
    registry: &SymbolRegistry,
    satisfied: &mut dyn FnMut(TypeHash, TypeHash) -> bool,
) -> Option<SignatureMatch> {
    if func.def.is_member() || func.def.params.is_empty() {
        return None;
    }
    // Cheap arity and argument checks first; constraint checks may recurse.
    let (arg_conversions, total_cost) = match_args(func.def.tail_params(), args, registry)?;
    let receiver_conversion = match_receiver(func, receiver, registry, satisfied)?;
    Some(SignatureMatch {
        func_hash: func.def.func_hash,
        receiver_conversion: Some(receiver_conversion),
        arg_conversions,
        total_cost,
    })
}

impl<'a> ResolutionContext<'a> {
    /// Whether `callable` accepts `receiver.name(args)`.
    ///
    /// Members are matched as members; extensions through their receiver
    /// parameter. Plain free functions never accept member-call syntax.
    pub fn matches(
        &self,
        callable: &FunctionEntry,
        receiver: &DataType,
        args: &[DataType],
    ) -> bool {
        if callable.def.is_member() {
            return match_member(callable, receiver, args, self.registry()).is_some();
        }
        if !callable.def.is_extension() {
            return false;
        }
        match_bound_call(callable, receiver, args, self.registry(), &mut |c, t| {
            self.satisfies(c, t)
        })
        .is_some()
    }
}
