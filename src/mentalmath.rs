use rand::Rng;
use rust_decimal::Decimal;

/// Question difficulty with its scoring weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    /// Points awarded for a right answer.
    pub fn award(self) -> i64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Difficult => 3,
        }
    }

    /// Points deducted for a wrong answer. Easy mistakes cost the most.
    pub fn penalty(self) -> i64 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 1,
            Difficulty::Difficult => 2,
        }
    }

    fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            _ => Difficulty::Difficult,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '*',
            Operation::Divide => '/',
        }
    }

    fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..4) {
            0 => Operation::Add,
            1 => Operation::Subtract,
            2 => Operation::Multiply,
            _ => Operation::Divide,
        }
    }

    fn is_additive(self) -> bool {
        matches!(self, Operation::Add | Operation::Subtract)
    }
}

/// One generated question. The answer is exact, so decimal questions check
/// cleanly against typed input.
#[derive(Debug, Clone)]
pub struct Question {
    pub prompt: String,
    pub answer: Decimal,
    pub difficulty: Difficulty,
}

/// Operand ranges per (operation class, difficulty, decimals). Decimal
/// operands only exist for medium and difficult.
fn operand_ranges(
    operation: Operation,
    difficulty: Difficulty,
    decimals: bool,
) -> ((i64, i64), (i64, i64)) {
    if operation.is_additive() {
        if decimals {
            match difficulty {
                Difficulty::Easy | Difficulty::Medium => ((1, 99), (1, 99)),
                Difficulty::Difficult => ((100, 1000), (100, 1000)),
            }
        } else {
            match difficulty {
                Difficulty::Easy => ((10, 200), (10, 200)),
                Difficulty::Medium => ((1000, 10000), (1000, 10000)),
                Difficulty::Difficult => ((10000, 100000), (10000, 100000)),
            }
        }
    } else if decimals {
        match difficulty {
            Difficulty::Easy | Difficulty::Medium => ((1, 20), (1, 10)),
            Difficulty::Difficult => ((100, 1000), (0, 100)),
        }
    } else {
        match difficulty {
            Difficulty::Easy => ((1, 99), (1, 9)),
            Difficulty::Medium => ((10, 99), (10, 20)),
            Difficulty::Difficult => ((100, 1000), (50, 200)),
        }
    }
}

/// A random operand: an integer from the range, or the same scaled down by
/// 1-3 decimal places.
fn random_operand(rng: &mut impl Rng, range: (i64, i64), decimals: bool) -> Decimal {
    let (lo, hi) = range;
    let value = rng.gen_range(lo..=hi);
    if decimals {
        Decimal::new(value, rng.gen_range(1..=3))
    } else {
        Decimal::from(value)
    }
}

/// Generate one random question. `force_easy` pins the difficulty for a
/// practice session that wants easy questions only.
pub fn generate_question(rng: &mut impl Rng, force_easy: bool) -> Question {
    loop {
        let operation = Operation::random(rng);
        let decimals = rng.gen_bool(0.5);
        let difficulty = if force_easy {
            Difficulty::Easy
        } else {
            Difficulty::random(rng)
        };

        // Easy questions stay integer; redraw instead of mixing in decimals.
        if difficulty == Difficulty::Easy && decimals {
            continue;
        }

        let (range_a, range_b) = operand_ranges(operation, difficulty, decimals);
        let a = random_operand(rng, range_a, decimals);
        let mut b = random_operand(rng, range_b, decimals);

        // A zero divisor would make the question unanswerable.
        while operation == Operation::Divide && b.is_zero() {
            b = random_operand(rng, range_b, decimals);
        }

        // Division is built backwards (dividend = answer * divisor) so the
        // quotient is always exact.
        let (lhs, rhs, answer) = match operation {
            Operation::Add => (a, b, a + b),
            Operation::Subtract => (a, b, a - b),
            Operation::Multiply => (a, b, a * b),
            Operation::Divide => (a * b, b, a),
        };

        return Question {
            prompt: format!("{} {} {}", lhs, operation.symbol(), rhs),
            answer,
            difficulty,
        };
    }
}

/// Check a typed answer against the exact one. "1.50" for 1.5 counts;
/// anything unparseable is wrong.
pub fn check_answer(correct: &Decimal, input: &str) -> bool {
    input
        .trim()
        .parse::<Decimal>()
        .map(|value| value == *correct)
        .unwrap_or(false)
}

/// Apply the scoring table to the running score.
pub fn update_score(difficulty: Difficulty, correct: bool, score: i64) -> i64 {
    if correct {
        score + difficulty.award()
    } else {
        score - difficulty.penalty()
    }
}
