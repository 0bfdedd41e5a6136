//! Pure operation tables: the evaluators, identity elements, and
//! relational/logical classification for every SyReC operator, plus
//! bit-width-aware constant truncation.
//!
//! Nothing in this module touches the symbol table or diagnostics; every
//! function here is a total or checked-total function over plain `u32`
//! values, so it can be unit tested in isolation and reused by both the
//! expression builder (for constant folding) and anything downstream that
//! wants to re-evaluate a fully-constant IR fragment.

/// The largest bit-width a SyReC variable may declare.
pub const MAX_SUPPORTED_BITWIDTH: u32 = 32;

/// A binary operation usable inside a SyReC expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperation {
    Add,
    Subtract,
    Exor,
    Multiply,
    Divide,
    /// `*>`: keeps the upper half of the full-width product.
    FracDivide,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    LogicalAnd,
    LogicalOr,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessEquals,
    GreaterEquals,
}

impl BinaryOperation {
    /// The source-level operator spelling.
    pub const fn symbol(self) -> &'static str {
        use BinaryOperation::*;
        match self {
            Add => "+",
            Subtract => "-",
            Exor => "^",
            Multiply => "*",
            Divide => "/",
            FracDivide => "*>",
            Modulo => "%",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            LogicalAnd => "&&",
            LogicalOr => "||",
            Equals => "=",
            NotEquals => "!=",
            LessThan => "<",
            GreaterThan => ">",
            LessEquals => "<=",
            GreaterEquals => ">=",
        }
    }

    /// Relational and logical operations always produce a single-bit
    /// result, regardless of their operands' bit-width.
    pub const fn is_relational_or_logical(self) -> bool {
        use BinaryOperation::*;
        matches!(
            self,
            LogicalAnd
                | LogicalOr
                | Equals
                | NotEquals
                | LessThan
                | GreaterThan
                | LessEquals
                | GreaterEquals
        )
    }

    /// Operations whose right-hand operand may legally be a runtime value
    /// of zero, which must be guarded against rather than folded through.
    pub const fn is_division_class(self) -> bool {
        use BinaryOperation::*;
        matches!(self, Divide | FracDivide | Modulo)
    }

    /// The identity element on the left-hand side of this operation, if
    /// one exists (i.e. the value `e` such that `e op x == x` for all `x`).
    pub const fn lhs_identity(self) -> Option<u32> {
        use BinaryOperation::*;
        match self {
            Add | Exor | BitwiseOr | LogicalOr => Some(0),
            _ => None,
        }
    }

    /// The identity element on the right-hand side of this operation, if
    /// one exists (i.e. the value `e` such that `x op e == x` for all `x`).
    pub const fn rhs_identity(self) -> Option<u32> {
        use BinaryOperation::*;
        match self {
            Add | Exor | BitwiseOr | LogicalOr => Some(0),
            Subtract => Some(0),
            LogicalAnd => Some(1),
            _ => None,
        }
    }

    /// Returns true if `value` is this operation's identity element when
    /// it occupies the side indicated by `is_rhs`.
    pub fn is_identity_element(self, value: u32, is_rhs: bool) -> bool {
        let identity = if is_rhs {
            self.rhs_identity()
        } else {
            self.lhs_identity()
        };
        identity == Some(value)
    }
}

/// A shift operation usable inside a SyReC expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShiftOperation {
    Left,
    Right,
}

impl ShiftOperation {
    pub const fn symbol(self) -> &'static str {
        match self {
            ShiftOperation::Left => "<<",
            ShiftOperation::Right => ">>",
        }
    }
}

/// The operator of a unary-assignment statement (`~=`, `++=`, `--=`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryStatementOperation {
    Invert,
    Increment,
    Decrement,
}

impl UnaryStatementOperation {
    pub const fn symbol(self) -> &'static str {
        match self {
            UnaryStatementOperation::Invert => "~=",
            UnaryStatementOperation::Increment => "++=",
            UnaryStatementOperation::Decrement => "--=",
        }
    }
}

/// The operator of an assignment statement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AssignOperation {
    Add,
    Subtract,
    Exor,
}

impl AssignOperation {
    pub const fn symbol(self) -> &'static str {
        match self {
            AssignOperation::Add => "+=",
            AssignOperation::Subtract => "-=",
            AssignOperation::Exor => "^=",
        }
    }

    /// The equivalent binary operation, used when folding the assignment's
    /// right-hand side against the target's current value is meaningful
    /// (e.g. displaying or re-deriving the statement as an expression).
    pub const fn as_binary_operation(self) -> BinaryOperation {
        match self {
            AssignOperation::Add => BinaryOperation::Add,
            AssignOperation::Subtract => BinaryOperation::Subtract,
            AssignOperation::Exor => BinaryOperation::Exor,
        }
    }
}

/// Which rule to use when a constant value must be narrowed to fit a
/// smaller operand bit-width.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegerConstantTruncationMode {
    #[default]
    Modulo,
    BitwiseAnd,
}

/// Truncate `value` so that it fits within `bitwidth` bits, using `mode` to
/// decide how values that don't already fit are narrowed.
///
/// This is always a pure function of its three arguments: truncation mode
/// is threaded through explicitly rather than being global state, so the
/// same expression tree can in principle be folded under two different
/// configured modes without any shared mutable state between the two runs.
pub fn truncate_constant_to_bitwidth(
    value: u32,
    bitwidth: u32,
    mode: IntegerConstantTruncationMode,
) -> u32 {
    if bitwidth == 0 {
        return 0;
    }

    // 2^bitwidth - 1, saturating for bitwidth >= 32 so the shift never
    // overflows.
    let max_storable = if bitwidth >= 32 {
        return value;
    } else {
        (1u32 << bitwidth) - 1
    };

    if value < max_storable {
        return value;
    }

    match mode {
        IntegerConstantTruncationMode::BitwiseAnd => value & max_storable,
        IntegerConstantTruncationMode::Modulo => value % max_storable,
    }
}

/// The ways a pure operation evaluation can fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    #[error("division by zero")]
    DivisionByZero,
}

/// Evaluate `op` over the two known constant operands `a` and `b`.
///
/// `Add`/`Subtract`/`Multiply` wrap on overflow, matching the fixed-width,
/// no-trap arithmetic of reversible hardware. Division-class operations
/// fail with [`OperationError::DivisionByZero`] rather than panicking.
pub fn eval_binary(op: BinaryOperation, a: u32, b: u32) -> Result<u32, OperationError> {
    use BinaryOperation::*;
    Ok(match op {
        Add => a.wrapping_add(b),
        Subtract => a.wrapping_sub(b),
        Exor => a ^ b,
        Multiply => a.wrapping_mul(b),
        Divide => {
            if b == 0 {
                return Err(OperationError::DivisionByZero);
            }
            a / b
        }
        FracDivide => {
            if b == 0 {
                return Err(OperationError::DivisionByZero);
            }
            (((a as u64) * (b as u64)) >> 32) as u32
        }
        Modulo => {
            if b == 0 {
                return Err(OperationError::DivisionByZero);
            }
            a % b
        }
        BitwiseAnd => a & b,
        BitwiseOr => a | b,
        LogicalAnd => u32::from(a != 0 && b != 0),
        LogicalOr => u32::from(a != 0 || b != 0),
        Equals => u32::from(a == b),
        NotEquals => u32::from(a != b),
        LessThan => u32::from(a < b),
        GreaterThan => u32::from(a > b),
        LessEquals => u32::from(a <= b),
        GreaterEquals => u32::from(a >= b),
    })
}

/// Evaluate a shift of `value` by `amount` positions.
///
/// `eval_shift(_, 0, _) == 0` and `eval_shift(_, v, 0) == v`, matching the
/// short-circuiting rule that lets a shift fold even when only one operand
/// is known to be exactly zero.
pub fn eval_shift(op: ShiftOperation, value: u32, amount: u32) -> u32 {
    if value == 0 {
        return 0;
    }
    if amount == 0 {
        return value;
    }
    match op {
        ShiftOperation::Left => value.wrapping_shl(amount),
        ShiftOperation::Right => value.wrapping_shr(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_modulo_matches_spec_example() {
        // (15 + 2) at bitwidth 4 overflows 15, modulo-truncated: 17 % 15 = 2
        let sum = eval_binary(BinaryOperation::Add, 15, 2).unwrap();
        assert_eq!(sum, 17);
        assert_eq!(
            truncate_constant_to_bitwidth(sum, 4, IntegerConstantTruncationMode::Modulo),
            2
        );
    }

    #[test]
    fn truncation_bitwise_and_mode() {
        assert_eq!(
            truncate_constant_to_bitwidth(13, 3, IntegerConstantTruncationMode::BitwiseAnd),
            13 & 3
        );
    }

    #[test]
    fn truncation_is_noop_below_threshold() {
        assert_eq!(
            truncate_constant_to_bitwidth(3, 4, IntegerConstantTruncationMode::Modulo),
            3
        );
    }

    #[test]
    fn truncation_zero_bitwidth_collapses_to_zero() {
        assert_eq!(
            truncate_constant_to_bitwidth(42, 0, IntegerConstantTruncationMode::Modulo),
            0
        );
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(
            eval_binary(BinaryOperation::Divide, 4, 0),
            Err(OperationError::DivisionByZero)
        );
        assert_eq!(
            eval_binary(BinaryOperation::Modulo, 4, 0),
            Err(OperationError::DivisionByZero)
        );
        assert_eq!(
            eval_binary(BinaryOperation::FracDivide, 4, 0),
            Err(OperationError::DivisionByZero)
        );
    }

    #[test]
    fn frac_divide_keeps_upper_half_of_product() {
        // u32::MAX * 2 = 0x1_FFFF_FFFE, upper 32 bits = 1
        assert_eq!(eval_binary(BinaryOperation::FracDivide, u32::MAX, 2), Ok(1));
    }

    #[test]
    fn identity_elements_match_table() {
        assert!(BinaryOperation::Add.is_identity_element(0, true));
        assert!(BinaryOperation::Add.is_identity_element(0, false));
        assert!(BinaryOperation::Subtract.is_identity_element(0, true));
        assert!(!BinaryOperation::Subtract.is_identity_element(0, false));
        assert!(!BinaryOperation::Multiply.is_identity_element(1, true));
        assert!(!BinaryOperation::Multiply.is_identity_element(1, false));
        assert!(BinaryOperation::LogicalAnd.is_identity_element(1, true));
        assert!(!BinaryOperation::Equals.is_identity_element(0, true));
    }

    #[test]
    fn relational_ops_are_classified() {
        assert!(BinaryOperation::Equals.is_relational_or_logical());
        assert!(BinaryOperation::LogicalAnd.is_relational_or_logical());
        assert!(!BinaryOperation::Add.is_relational_or_logical());
    }

    #[test]
    fn shift_short_circuits_on_zero() {
        assert_eq!(eval_shift(ShiftOperation::Left, 0, 7), 0);
        assert_eq!(eval_shift(ShiftOperation::Right, 9, 0), 9);
        assert_eq!(eval_shift(ShiftOperation::Left, 1, 3), 8);
    }
}
