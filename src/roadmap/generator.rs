//! Rule engine that turns a financial snapshot and a goal list into an
//! ordered roadmap.
//!
//! Rules are evaluated in four layers (foundation, goals, advanced,
//! employment). Each layer yields candidate steps; the candidates are then
//! stably sorted by priority, cut to [`MAX_STEPS`] and numbered from 1.
//! Emission order is the tie-break between steps of equal priority, so the
//! layer order below is part of the output contract.

use crate::goals::repo_types::{Goal, GoalType};
use crate::roadmap::model::{
    EmploymentStatus, FinancialState, RoadmapStep, StepCategory, UserProfile,
};

/// Most steps a roadmap ever holds.
pub const MAX_STEPS: usize = 6;

/// Share of income assumed to go to living expenses.
pub const EXPENSE_RATIO: f64 = 0.7;

/// Build the roadmap for one user.
///
/// `goals` must be non-empty; callers reject empty goal lists before calling.
/// The function never fails: ratios with a zero denominator (zero income)
/// count as 0% progress.
pub fn generate(
    profile: &UserProfile,
    state: &FinancialState,
    goals: &[Goal],
) -> Vec<RoadmapStep> {
    finalize(candidate_steps(profile, state, goals))
}

/// Every step the rules emit, in emission order, before sorting and trimming.
pub fn candidate_steps(
    profile: &UserProfile,
    state: &FinancialState,
    goals: &[Goal],
) -> Vec<RoadmapStep> {
    let rules = Rules::new(profile, state);

    // sort_by_key is stable: equal priorities keep input order.
    let mut ordered: Vec<&Goal> = goals.iter().collect();
    ordered.sort_by_key(|g| g.priority);

    rules
        .foundation()
        .into_iter()
        .chain(ordered.into_iter().flat_map(|g| rules.for_goal(g.goal_type)))
        .chain(rules.advanced())
        .chain(rules.employment())
        .collect()
}

/// Stable sort by step priority, keep the first [`MAX_STEPS`], renumber 1..n.
pub fn finalize(mut steps: Vec<RoadmapStep>) -> Vec<RoadmapStep> {
    steps.sort_by_key(|s| s.priority);
    steps.truncate(MAX_STEPS);
    for (idx, step) in steps.iter_mut().enumerate() {
        step.step_number = idx as u32 + 1;
    }
    steps
}

/// `part / whole` as a percentage; 0 when `whole` is not positive.
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

struct Rules<'a> {
    profile: &'a UserProfile,
    state: &'a FinancialState,
    monthly_expenses: f64,
    two_month: f64,
    six_month: f64,
    fund: f64,
}

impl<'a> Rules<'a> {
    fn new(profile: &'a UserProfile, state: &'a FinancialState) -> Self {
        let monthly_expenses = profile.monthly_income * EXPENSE_RATIO;
        Self {
            profile,
            state,
            monthly_expenses,
            two_month: monthly_expenses * 2.0,
            six_month: monthly_expenses * 6.0,
            // Cash savings stand in for the emergency fund.
            fund: state.cash_assets,
        }
    }

    fn asset_threshold(&self) -> f64 {
        self.monthly_expenses * 12.0
    }

    fn foundation(&self) -> Vec<RoadmapStep> {
        let mut out = Vec::new();

        if self.fund < self.two_month {
            let progress = if self.fund > 0.0 {
                percent(self.fund, self.two_month).min(100.0)
            } else {
                0.0
            };
            out.push(
                step("Build 2-Month Emergency Fund", StepCategory::Foundation, 1)
                    .describe(
                        format!(
                            "Save ${:.2} as your financial safety net. This protects you from unexpected expenses.",
                            self.two_month
                        ),
                        "Emergency fund is the foundation of financial security",
                    )
                    .target(self.two_month)
                    .progress(progress),
            );
        }

        if self.state.has_high_interest_debt {
            out.push(
                step("Eliminate High-Interest Debt", StepCategory::Foundation, 2)
                    .describe(
                        "Pay off credit cards and loans with interest rates above 10%. Use the avalanche method (highest interest first).",
                        "High-interest debt costs more than investment returns",
                    )
                    .target(self.state.total_liabilities),
            );
        }

        if self.fund >= self.two_month && self.fund < self.six_month {
            // Not clamped: the gate keeps fund below the target.
            out.push(
                step("Expand Emergency Fund to 6 Months", StepCategory::Foundation, 3)
                    .describe(
                        format!(
                            "Grow your safety net to ${:.2}. This provides robust protection.",
                            self.six_month
                        ),
                        "Larger emergency fund enables risk-taking in investing and business",
                    )
                    .target(self.six_month)
                    .progress(percent(self.fund, self.six_month))
                    .parallel(),
            );
        }

        out
    }

    fn for_goal(&self, goal_type: GoalType) -> Vec<RoadmapStep> {
        match goal_type {
            GoalType::EmergencyFund => self.emergency_fund_goal(),
            GoalType::StartInvesting => vec![self.start_investing_goal()],
            GoalType::StartBusiness => self.start_business_goal(),
            GoalType::PassiveIncome => vec![self.passive_income_goal()],
            GoalType::RetireEarly => vec![step(
                "Aggressive Retirement Investing",
                StepCategory::WealthBuilding,
                2,
            )
            .describe(
                "Target 30-50% savings rate. Max out retirement accounts and invest in index funds.",
                "Early retirement requires aggressive saving and investing",
            )
            .parallel()],
            GoalType::DebtFreedom => self.debt_freedom_goal(),
        }
    }

    // Below six months the foundation layer already covers the fund.
    fn emergency_fund_goal(&self) -> Vec<RoadmapStep> {
        if self.fund < self.six_month {
            return Vec::new();
        }
        vec![step("Emergency Fund Complete ✓", StepCategory::Foundation, 5)
            .describe(
                "Your emergency fund goal is achieved. Maintain this buffer.",
                "Goal accomplished",
            )
            .target(self.six_month)
            .progress(100.0)
            .parallel()]
    }

    fn start_investing_goal(&self) -> RoadmapStep {
        if self.fund >= self.two_month && !self.state.has_high_interest_debt {
            let progress = if self.state.investment_assets > 0.0 { 50.0 } else { 0.0 };
            step("Start Investing in Index Funds", StepCategory::WealthBuilding, 2)
                .describe(
                    "Begin with 10-15% of monthly income in low-cost index funds. Start with $100-500/month.",
                    "Time in the market beats timing the market",
                )
                .progress(progress)
                .parallel()
        } else {
            step("Prepare Foundation for Investing", StepCategory::Preparation, 4).describe(
                "Complete emergency fund and eliminate high-interest debt before investing.",
                "Foundation must be solid before building wealth",
            )
        }
    }

    fn start_business_goal(&self) -> Vec<RoadmapStep> {
        if self.profile.employment_status != EmploymentStatus::Entrepreneur {
            return vec![step("Launch Side Hustle", StepCategory::WealthBuilding, 3)
                .describe(
                    "Start a side business alongside your employment. Begin with low-cost, skill-based ventures.",
                    "Diversify income sources and build entrepreneurial skills",
                )
                .parallel()];
        }

        let progress = if self.state.business_assets > 0.0 { 40.0 } else { 0.0 };
        let mut out = vec![step("Invest in Business Growth", StepCategory::WealthBuilding, 2)
            .describe(
                "Allocate resources to scale your business. Focus on revenue-generating activities.",
                "Your business is your primary wealth vehicle",
            )
            .progress(progress)
            .parallel()];

        // Business income is volatile, so the six month buffer matters more.
        if self.fund < self.six_month {
            out.push(
                step("Increase Emergency Fund (Business Risk)", StepCategory::Foundation, 2)
                    .describe(
                        "As an entrepreneur, maintain 6-12 months of expenses due to income variability.",
                        "Business income is less stable than employment",
                    )
                    .target(self.six_month)
                    .progress(percent(self.fund, self.six_month))
                    .parallel(),
            );
        }
        out
    }

    fn passive_income_goal(&self) -> RoadmapStep {
        let threshold = self.asset_threshold();
        if self.state.total_assets >= threshold {
            step("Build Passive Income Streams", StepCategory::Advanced, 3)
                .describe(
                    "Invest in dividend stocks, rental properties, or digital products that generate income.",
                    "Sufficient asset base to generate meaningful passive income",
                )
                .progress(20.0)
                .parallel()
        } else {
            step("Build Asset Base for Passive Income", StepCategory::Preparation, 4)
                .describe(
                    format!(
                        "Accumulate ${:.2} in assets before focusing on passive income.",
                        threshold
                    ),
                    "Need sufficient capital to generate meaningful passive income",
                )
                .target(threshold)
                .progress(percent(self.state.total_assets, threshold))
                .parallel()
        }
    }

    fn debt_freedom_goal(&self) -> Vec<RoadmapStep> {
        if self.state.total_liabilities <= 0.0 {
            return Vec::new();
        }
        vec![step("Execute Debt Payoff Strategy", StepCategory::Foundation, 2)
            .describe(
                "Use avalanche method: pay minimum on all debts, extra payments to highest interest rate.",
                "Debt freedom provides financial flexibility and peace of mind",
            )
            .target(self.state.total_liabilities)]
    }

    fn advanced(&self) -> Option<RoadmapStep> {
        let solid = self.fund >= self.six_month
            && !self.state.has_high_interest_debt
            && self.state.total_assets > self.asset_threshold();
        solid.then(|| {
            step("Diversify Investments", StepCategory::Advanced, 5)
                .describe(
                    "Explore real estate, bonds, or alternative investments. Don't put all eggs in one basket.",
                    "Diversification reduces risk and maximizes returns",
                )
                .parallel()
        })
    }

    fn employment(&self) -> Option<RoadmapStep> {
        (self.profile.employment_status == EmploymentStatus::Student).then(|| {
            step("Invest in Skills & Education", StepCategory::Foundation, 1)
                .describe(
                    "Your biggest asset is your earning potential. Focus on high-value skills.",
                    "Human capital is the foundation of wealth creation",
                )
                .parallel()
        })
    }
}

/// A sequential, target-less step at 0% progress. Numbered later by
/// [`finalize`].
fn step(title: &str, category: StepCategory, priority: u8) -> RoadmapStep {
    RoadmapStep {
        step_number: 0,
        title: title.to_string(),
        description: String::new(),
        category,
        priority,
        can_run_parallel: false,
        target_amount: 0.0,
        current_progress: 0.0,
        is_completed: false,
        reasoning: String::new(),
    }
}

impl RoadmapStep {
    fn describe(mut self, description: impl Into<String>, reasoning: &str) -> Self {
        self.description = description.into();
        self.reasoning = reasoning.to_string();
        self
    }

    fn target(mut self, amount: f64) -> Self {
        self.target_amount = amount;
        self
    }

    fn progress(mut self, pct: f64) -> Self {
        self.current_progress = pct;
        self
    }

    fn parallel(mut self) -> Self {
        self.can_run_parallel = true;
        self
    }
}
