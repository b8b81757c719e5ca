//! Arithmetic calculator state machine
//!
//! A small explicit state machine over a display string: digits and
//! the decimal point edit the display, operators fold pending
//! operations, `=` resolves and emits a completed entry for the
//! history log. Errors (divide by zero, non-finite results) abort the
//! pending computation and reset to the zero state.

use thiserror::Error;

/// Results are rounded to 8 decimal places to mask binary
/// floating-point artifacts (0.1 + 0.2 displays as 0.3).
fn round_display(value: f64) -> f64 {
    (value * 100_000_000.0).round() / 100_000_000.0
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    #[error("cannot divide by zero")]
    DivideByZero,

    #[error("result is too large")]
    Overflow,
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Display symbol, also used in the calculation log
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    /// Parse a button or keyboard character (`*` and `/` alias the
    /// display symbols).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '×' | '*' => Some(Self::Multiply),
            '÷' | '/' => Some(Self::Divide),
            _ => None,
        }
    }

    /// Evaluate `first <op> second` with display rounding applied.
    pub fn apply(self, first: f64, second: f64) -> Result<f64, CalcError> {
        let raw = match self {
            Self::Add => first + second,
            Self::Subtract => first - second,
            Self::Multiply => first * second,
            Self::Divide => {
                if second == 0.0 {
                    return Err(CalcError::DivideByZero);
                }
                first / second
            }
        };
        let rounded = round_display(raw);
        if !rounded.is_finite() {
            return Err(CalcError::Overflow);
        }
        Ok(rounded)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A resolved `=` press, ready for the history log
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationEntry {
    pub first_operand: f64,
    pub operator: Operator,
    pub second_operand: f64,
    pub result: f64,
}

/// Calculator key surface (buttons and their keyboard aliases)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    AllClear,
    ToggleSign,
}

impl Key {
    pub fn from_char(c: char) -> Option<Self> {
        if let Some(digit) = c.to_digit(10) {
            return Some(Self::Digit(digit as u8));
        }
        if let Some(op) = Operator::from_char(c) {
            return Some(Self::Operator(op));
        }
        match c {
            '.' => Some(Self::Decimal),
            '=' => Some(Self::Equals),
            'c' | 'C' => Some(Self::Clear),
            '±' => Some(Self::ToggleSign),
            _ => None,
        }
    }
}

/// Calculator state machine
#[derive(Debug, Clone)]
pub struct Calculator {
    display: String,
    previous_value: Option<f64>,
    operation: Option<Operator>,
    waiting_for_new_value: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            previous_value: None,
            operation: None,
            waiting_for_new_value: false,
        }
    }

    /// Current display string
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Pending operator, if an operand is stored
    pub fn pending_operation(&self) -> Option<Operator> {
        self.operation
    }

    fn input_value(&self) -> f64 {
        self.display.parse().unwrap_or(0.0)
    }

    pub fn input_digit(&mut self, digit: u8) {
        let digit = digit.min(9);
        if self.waiting_for_new_value {
            self.display = digit.to_string();
            self.waiting_for_new_value = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push_str(&digit.to_string());
        }
    }

    pub fn input_decimal(&mut self) {
        if self.waiting_for_new_value {
            self.display = "0.".to_string();
            self.waiting_for_new_value = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Reset the display only
    pub fn clear(&mut self) {
        self.display = "0".to_string();
    }

    /// Reset the whole machine to the zero state
    pub fn all_clear(&mut self) {
        self.display = "0".to_string();
        self.previous_value = None;
        self.operation = None;
        self.waiting_for_new_value = false;
    }

    pub fn toggle_sign(&mut self) {
        if self.display == "0" {
            return;
        }
        if let Some(stripped) = self.display.strip_prefix('-') {
            self.display = stripped.to_string();
        } else {
            self.display = format!("-{}", self.display);
        }
    }

    /// Press an operator: store the operand if none is pending,
    /// otherwise fold the pending operation against the current
    /// display and keep chaining.
    pub fn apply_operator(&mut self, next: Operator) -> Result<(), CalcError> {
        let input = self.input_value();

        if self.previous_value.is_none() {
            self.previous_value = Some(input);
        } else if let Some(pending) = self.operation {
            // previous_value is always Some here
            let first = self.previous_value.unwrap_or(0.0);
            match pending.apply(first, input) {
                Ok(value) => {
                    self.display = format_value(value);
                    self.previous_value = Some(value);
                }
                Err(e) => {
                    self.all_clear();
                    return Err(e);
                }
            }
        }

        self.waiting_for_new_value = true;
        self.operation = Some(next);
        Ok(())
    }

    /// Resolve the pending operation. Returns the completed entry, or
    /// `None` when nothing was pending.
    pub fn equals(&mut self) -> Result<Option<CalculationEntry>, CalcError> {
        let (Some(first), Some(operation)) = (self.previous_value, self.operation) else {
            return Ok(None);
        };

        let second = self.input_value();
        match operation.apply(first, second) {
            Ok(result) => {
                self.display = format_value(result);
                self.previous_value = Some(result);
                self.operation = None;
                self.waiting_for_new_value = true;
                Ok(Some(CalculationEntry {
                    first_operand: first,
                    operator: operation,
                    second_operand: second,
                    result,
                }))
            }
            Err(e) => {
                self.all_clear();
                Err(e)
            }
        }
    }

    /// Single entry point for the key surface.
    pub fn press(&mut self, key: Key) -> Result<Option<CalculationEntry>, CalcError> {
        match key {
            Key::Digit(d) => {
                self.input_digit(d);
                Ok(None)
            }
            Key::Decimal => {
                self.input_decimal();
                Ok(None)
            }
            Key::Operator(op) => self.apply_operator(op).map(|_| None),
            Key::Equals => self.equals(),
            Key::Clear => {
                self.clear();
                Ok(None)
            }
            Key::AllClear => {
                self.all_clear();
                Ok(None)
            }
            Key::ToggleSign => {
                self.toggle_sign();
                Ok(None)
            }
        }
    }
}

fn format_value(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_number(calc: &mut Calculator, text: &str) {
        for c in text.chars() {
            calc.press(Key::from_char(c).unwrap()).unwrap();
        }
    }

    #[test]
    fn starts_at_zero() {
        let calc = Calculator::new();
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn digits_replace_leading_zero() {
        let mut calc = Calculator::new();
        calc.input_digit(0);
        assert_eq!(calc.display(), "0");
        calc.input_digit(7);
        assert_eq!(calc.display(), "7");
        calc.input_digit(5);
        assert_eq!(calc.display(), "75");
    }

    #[test]
    fn single_decimal_point_only() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "3.1");
        calc.input_decimal();
        assert_eq!(calc.display(), "3.1");
    }

    #[test]
    fn decimal_after_operator_starts_fresh() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "5+");
        calc.input_decimal();
        assert_eq!(calc.display(), "0.");
    }

    #[test]
    fn simple_addition() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "12+30");
        let entry = calc.equals().unwrap().unwrap();
        assert_eq!(entry.first_operand, 12.0);
        assert_eq!(entry.operator, Operator::Add);
        assert_eq!(entry.second_operand, 30.0);
        assert_eq!(entry.result, 42.0);
        assert_eq!(calc.display(), "42");
    }

    #[test]
    fn chained_operators_fold_left() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "2+3+");
        // 2 + 3 folded when the second + was pressed
        assert_eq!(calc.display(), "5");
        type_number(&mut calc, "4");
        let entry = calc.equals().unwrap().unwrap();
        assert_eq!(entry.first_operand, 5.0);
        assert_eq!(entry.result, 9.0);
    }

    #[test]
    fn floating_point_artifacts_are_rounded() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "0.1+0.2");
        let entry = calc.equals().unwrap().unwrap();
        assert_eq!(entry.result, 0.3);
        assert_eq!(calc.display(), "0.3");
    }

    #[test]
    fn divide_by_zero_resets_to_zero_state() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "8÷0");
        let err = calc.equals().unwrap_err();
        assert_eq!(err, CalcError::DivideByZero);
        assert_eq!(calc.display(), "0");
        assert!(calc.pending_operation().is_none());
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(
            Operator::Multiply.apply(f64::MAX, 10.0),
            Err(CalcError::Overflow)
        );
    }

    #[test]
    fn equals_without_pending_operation_is_noop() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "42");
        assert_eq!(calc.equals().unwrap(), None);
        assert_eq!(calc.display(), "42");
    }

    #[test]
    fn result_feeds_next_calculation() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "6×7");
        calc.equals().unwrap();
        type_number(&mut calc, "-2");
        let entry = calc.equals().unwrap().unwrap();
        assert_eq!(entry.first_operand, 42.0);
        assert_eq!(entry.result, 40.0);
    }

    #[test]
    fn toggle_sign_flips_nonzero_display() {
        let mut calc = Calculator::new();
        calc.toggle_sign();
        assert_eq!(calc.display(), "0");
        type_number(&mut calc, "15");
        calc.toggle_sign();
        assert_eq!(calc.display(), "-15");
        calc.toggle_sign();
        assert_eq!(calc.display(), "15");
    }

    #[test]
    fn clear_keeps_pending_operation() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "9+5");
        calc.clear();
        assert_eq!(calc.display(), "0");
        // 9 + 0 still resolves
        let entry = calc.equals().unwrap().unwrap();
        assert_eq!(entry.result, 9.0);
    }

    #[test]
    fn keyboard_aliases_map_to_operators() {
        assert_eq!(Key::from_char('*'), Some(Key::Operator(Operator::Multiply)));
        assert_eq!(Key::from_char('/'), Some(Key::Operator(Operator::Divide)));
        assert_eq!(Key::from_char('q'), None);
    }

    #[test]
    fn digits_after_equals_start_a_new_number() {
        let mut calc = Calculator::new();
        type_number(&mut calc, "1+1");
        calc.equals().unwrap();
        type_number(&mut calc, "7");
        assert_eq!(calc.display(), "7");
    }
}
