//! Running state of a single projection

/// Mutable state owned by the engine for the duration of one run
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current projection month (1-indexed, 0 before the first month)
    pub month: u32,

    /// Projection year (1-indexed)
    pub year: u32,

    /// Month within year (1-12)
    pub month_in_year: u32,

    /// Principal plus contributions plus folded/reinvested interest
    pub balance: f64,

    /// Interest accrued since the last compounding event
    pub interest_bucket: f64,

    pub total_interest_earned: f64,
    pub total_contributions: f64,
    pub total_encashed_interest: f64,

    /// Growth-adjusted contribution amount for the current month
    pub current_contribution_amount: f64,

    /// Balance shown at the end of the previous month
    pub last_ending_balance: f64,
}

impl SimulationState {
    /// Initialize state at projection start
    pub fn new(principal: f64) -> Self {
        Self {
            month: 0,
            year: 1,
            month_in_year: 0,
            balance: principal,
            interest_bucket: 0.0,
            total_interest_earned: 0.0,
            total_contributions: 0.0,
            total_encashed_interest: 0.0,
            current_contribution_amount: 0.0,
            last_ending_balance: principal,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.month += 1;
        self.year = (self.month - 1) / 12 + 1;
        self.month_in_year = (self.month - 1) % 12 + 1;
    }

    pub fn contribute(&mut self, amount: f64) {
        self.balance += amount;
        self.total_contributions += amount;
    }

    pub fn accrue(&mut self, interest: f64) {
        self.interest_bucket += interest;
        self.total_interest_earned += interest;
    }

    /// Fold the whole bucket into the balance
    pub fn fold_bucket(&mut self) {
        self.balance += self.interest_bucket;
        self.interest_bucket = 0.0;
    }

    /// Withdraw `encashed` and reinvest the rest of the bucket
    pub fn settle_bucket(&mut self, encashed: f64, reinvested: f64) {
        self.total_encashed_interest += encashed;
        self.balance += reinvested;
        self.interest_bucket = 0.0;
    }

    /// Balance including interest still waiting in the bucket
    pub fn balance_with_bucket(&self) -> f64 {
        self.balance + self.interest_bucket
    }
}
