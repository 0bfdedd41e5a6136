//! Validates a [`VariableAccess`]'s per-dimension indices and bit range
//! against the declared shape of the variable it references.
//!
//! A pure utility: it never touches the symbol table or the diagnostic
//! sink. The statement/expression builders translate a non-`Ok`
//! classification into the matching `SemanticErrorKind` at the access's
//! source position.

use syrec_ir::{Number, VariableAccess};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Classification {
    Ok,
    OutOfRange,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DimensionIndexResult {
    pub classification: Classification,
    /// The index value, when syntactically a constant was present —
    /// recorded even for an `OutOfRange` classification so a diagnostic
    /// can quote it.
    pub value: Option<u32>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BitRangeEndpointResult {
    pub classification: Classification,
    pub value: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexValidationResult {
    pub dimensions: Vec<DimensionIndexResult>,
    pub bit_range: Option<(BitRangeEndpointResult, BitRangeEndpointResult)>,
}

impl IndexValidationResult {
    pub fn is_valid(&self) -> bool {
        let dims_ok = self.dimensions.iter().all(|d| d.classification == Classification::Ok);
        let range_ok = match &self.bit_range {
            Some((start, end)) => start.classification == Classification::Ok && end.classification == Classification::Ok,
            None => true,
        };
        dims_ok && range_ok
    }
}

fn classify_endpoint(number: &Number, bound: u32) -> BitRangeEndpointResult {
    match number {
        Number::Constant(v) => BitRangeEndpointResult {
            classification: if *v < bound { Classification::Ok } else { Classification::OutOfRange },
            value: Some(*v),
        },
        _ => BitRangeEndpointResult {
            classification: Classification::Unknown,
            value: None,
        },
    }
}

/// Classify every dimension index and the optional bit range of `access`
/// against `access.var`'s declared shape.
pub fn validate(access: &VariableAccess) -> IndexValidationResult {
    let dimensions = access
        .indexes
        .iter()
        .enumerate()
        .map(|(i, index_expr)| match access.var.dimensions.get(i) {
            None => DimensionIndexResult {
                classification: Classification::Unknown,
                value: index_expr.constant_value(),
            },
            Some(&extent) => match index_expr.constant_value() {
                Some(v) => DimensionIndexResult {
                    classification: if v < extent { Classification::Ok } else { Classification::OutOfRange },
                    value: Some(v),
                },
                None => DimensionIndexResult {
                    classification: Classification::Unknown,
                    value: None,
                },
            },
        })
        .collect();

    let bit_range = access.range.as_ref().map(|(start, end)| {
        let bound = access.var.bitwidth;
        (classify_endpoint(start, bound), classify_endpoint(end, bound))
    });

    IndexValidationResult { dimensions, bit_range }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use syrec_ir::{Expression, Variable, VariableKind};
    use syrec_symbol::Symbol;

    fn var() -> Rc<Variable> {
        Variable::new(VariableKind::Wire, Symbol::intern("v"), vec![4, 1], 8)
    }

    #[test]
    fn constant_index_within_extent_is_ok() {
        let access = VariableAccess::new(
            var(),
            vec![Rc::new(Expression::Numeric(Number::constant(2), 8))],
            None,
        );
        let result = validate(&access);
        assert_eq!(result.dimensions[0].classification, Classification::Ok);
        assert!(result.is_valid());
    }

    #[test]
    fn constant_index_beyond_extent_is_out_of_range() {
        let access = VariableAccess::new(
            var(),
            vec![Rc::new(Expression::Numeric(Number::constant(9), 8))],
            None,
        );
        let result = validate(&access);
        assert_eq!(result.dimensions[0].classification, Classification::OutOfRange);
        assert!(!result.is_valid());
    }

    #[test]
    fn index_beyond_declared_dimension_count_is_unknown() {
        let access = VariableAccess::new(
            var(),
            vec![
                Rc::new(Expression::Numeric(Number::constant(0), 8)),
                Rc::new(Expression::Numeric(Number::constant(0), 8)),
                Rc::new(Expression::Numeric(Number::constant(0), 8)),
            ],
            None,
        );
        let result = validate(&access);
        assert_eq!(result.dimensions[2].classification, Classification::Unknown);
        assert!(!result.is_valid());
    }

    #[test]
    fn bit_range_out_of_range_end_fails() {
        let access = VariableAccess::new(var(), vec![], Some((Number::constant(0), Number::constant(9))));
        let result = validate(&access);
        let (_, end) = result.bit_range.unwrap();
        assert_eq!(end.classification, Classification::OutOfRange);
    }

    #[test]
    fn loop_variable_bit_range_endpoint_is_unknown() {
        let i = Symbol::intern("$i");
        let access = VariableAccess::new(var(), vec![], Some((Number::loop_variable(i), Number::constant(7))));
        let result = validate(&access);
        let (start, _) = result.bit_range.unwrap();
        assert_eq!(start.classification, Classification::Unknown);
        assert!(!result.is_valid());
    }
}
