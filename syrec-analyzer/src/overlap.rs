//! Classifies whether two variable accesses could alias at runtime.
//!
//! Used by the expression builder's restriction registry to detect
//! self-assignment overlap, and available standalone for anything else
//! that needs it. [`check_overlap`] is symmetric by construction: it never
//! examines which argument is `a` and which is `b` except through the
//! commutative comparisons it performs.

use syrec_ir::{Number, Variable, VariableAccess};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlapOutcome {
    /// `a` and `b` reference different declared variables; overlap is not
    /// meaningful to ask about.
    Unrelated,
    NotOverlapping,
    MaybeOverlapping,
    Overlapping {
        /// The constant index decided for each dimension both sides
        /// constrained.
        dimension_indices: Vec<u32>,
        first_overlapping_bit: u32,
    },
}

fn constant_dimension_index(access: &VariableAccess, dim: usize) -> Option<u32> {
    access.indexes.get(dim).and_then(|e| e.constant_value())
}

/// `(start, end)`, `None` meaning not statically known.
fn effective_bit_range(access: &VariableAccess) -> (Option<u32>, Option<u32>) {
    match &access.range {
        None => (Some(0), Some(access.var.bitwidth - 1)),
        Some((start, end)) => (number_as_constant(start), number_as_constant(end)),
    }
}

fn number_as_constant(number: &Number) -> Option<u32> {
    match number {
        Number::Constant(v) => Some(*v),
        _ => None,
    }
}

fn normalize(lo: u32, hi: u32) -> (u32, u32) {
    if lo <= hi {
        (lo, hi)
    } else {
        (hi, lo)
    }
}

/// Classify whether accesses `a` and `b` could reference the same storage.
pub fn check_overlap(a: &VariableAccess, b: &VariableAccess) -> OverlapOutcome {
    if !Variable::structurally_matches(&a.var, &b.var) {
        return OverlapOutcome::Unrelated;
    }

    let common_dims = a.indexes.len().min(b.indexes.len());
    let mut dimension_indices = Vec::with_capacity(a.indexes.len().max(b.indexes.len()));

    for dim in 0..common_dims {
        match (constant_dimension_index(a, dim), constant_dimension_index(b, dim)) {
            (Some(x), Some(y)) if x == y => dimension_indices.push(x),
            (Some(_), Some(_)) => return OverlapOutcome::NotOverlapping,
            _ => return OverlapOutcome::MaybeOverlapping,
        }
    }

    let max_dims = a.indexes.len().max(b.indexes.len());
    for dim in common_dims..max_dims {
        match a.var.dimensions.get(dim) {
            Some(1) => dimension_indices.push(0),
            _ => return OverlapOutcome::MaybeOverlapping,
        }
    }

    let (a_start, a_end) = effective_bit_range(a);
    let (b_start, b_end) = effective_bit_range(b);
    let a_unknowns = [a_start, a_end].iter().filter(|e| e.is_none()).count();
    let b_unknowns = [b_start, b_end].iter().filter(|e| e.is_none()).count();

    if a_unknowns >= 1 && b_unknowns >= 1 {
        return OverlapOutcome::MaybeOverlapping;
    }

    if a_unknowns == 0 && b_unknowns == 0 {
        let (a_lo, a_hi) = normalize(a_start.unwrap(), a_end.unwrap());
        let (b_lo, b_hi) = normalize(b_start.unwrap(), b_end.unwrap());
        return if a_hi < b_lo || b_hi < a_lo {
            OverlapOutcome::NotOverlapping
        } else {
            OverlapOutcome::Overlapping {
                dimension_indices,
                first_overlapping_bit: a_lo.max(b_lo),
            }
        };
    }

    // Exactly one side has an unknown endpoint, the other is fully known.
    let (partial_known, partial_unknown_count, known_lo, known_hi) = if a_unknowns > 0 {
        let known = [a_start, a_end].into_iter().flatten().next();
        (known, a_unknowns, b_start.unwrap(), b_end.unwrap())
    } else {
        let known = [b_start, b_end].into_iter().flatten().next();
        (known, b_unknowns, a_start.unwrap(), a_end.unwrap())
    };

    if partial_unknown_count >= 2 {
        return OverlapOutcome::MaybeOverlapping;
    }

    let (lo, hi) = normalize(known_lo, known_hi);
    match partial_known {
        Some(point) if lo <= point && point <= hi => OverlapOutcome::Overlapping {
            dimension_indices,
            first_overlapping_bit: point,
        },
        _ => OverlapOutcome::MaybeOverlapping,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use syrec_ir::VariableKind;
    use syrec_symbol::Symbol;

    fn whole(bitwidth: u32) -> Rc<VariableAccess> {
        let v = Variable::new(VariableKind::Wire, Symbol::intern("v"), vec![1], bitwidth);
        VariableAccess::whole(v)
    }

    fn ranged(bitwidth: u32, start: u32, end: u32) -> Rc<VariableAccess> {
        let v = Variable::new(VariableKind::Wire, Symbol::intern("v"), vec![1], bitwidth);
        VariableAccess::new(v, vec![], Some((Number::constant(start), Number::constant(end))))
    }

    #[test]
    fn overlapping_bit_ranges_report_first_overlapping_bit() {
        let a = ranged(16, 3, 7);
        let b = ranged(16, 5, 8);
        assert_eq!(
            check_overlap(&a, &b),
            OverlapOutcome::Overlapping {
                dimension_indices: vec![],
                first_overlapping_bit: 5,
            }
        );
    }

    #[test]
    fn disjoint_bit_ranges_do_not_overlap() {
        let a = ranged(16, 3, 7);
        let b = ranged(16, 8, 10);
        assert_eq!(check_overlap(&a, &b), OverlapOutcome::NotOverlapping);
    }

    #[test]
    fn unknown_endpoint_on_one_side_is_maybe_overlapping() {
        let i = Symbol::intern("$i");
        let v = Variable::new(VariableKind::Wire, Symbol::intern("v"), vec![1], 16);
        let a = VariableAccess::new(v.clone(), vec![], Some((Number::loop_variable(i), Number::constant(7))));
        let b = ranged(16, 3, 5);
        assert_eq!(check_overlap(&a, &b), OverlapOutcome::MaybeOverlapping);
    }

    #[test]
    fn check_overlap_is_symmetric() {
        let a = ranged(16, 3, 7);
        let b = ranged(16, 5, 8);
        assert_eq!(check_overlap(&a, &b), check_overlap(&b, &a));

        let i = Symbol::intern("$i");
        let v = Variable::new(VariableKind::Wire, Symbol::intern("v"), vec![1], 16);
        let c = VariableAccess::new(v, vec![], Some((Number::loop_variable(i), Number::constant(7))));
        assert_eq!(check_overlap(&a, &c), check_overlap(&c, &a));
    }

    #[test]
    fn different_variables_are_unrelated() {
        let a = whole(8);
        let other = Variable::new(VariableKind::Wire, Symbol::intern("w"), vec![1], 8);
        let b = VariableAccess::whole(other);
        assert_eq!(check_overlap(&a, &b), OverlapOutcome::Unrelated);
    }

    #[test]
    fn mismatched_constant_dimension_indices_do_not_overlap() {
        let v = Variable::new(VariableKind::Wire, Symbol::intern("v"), vec![4], 8);
        let a = VariableAccess::new(v.clone(), vec![Rc::new(syrec_ir::Expression::Numeric(Number::constant(0), 8))], None);
        let b = VariableAccess::new(v, vec![Rc::new(syrec_ir::Expression::Numeric(Number::constant(1), 8))], None);
        assert_eq!(check_overlap(&a, &b), OverlapOutcome::NotOverlapping);
    }
}
