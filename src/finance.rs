//! Investment, cash flow and income statement for a simulated year.
//!
//! These are straightforward calculations over the simulation's energy totals and the configured
//! prices; nothing here feeds back into the simulation.
use crate::config::{CostParameters, SimulationConfig, Tariffs};
use crate::simulation::{EnergyAccumulators, SimulationResults};
use crate::units::{Dimensionless, Money};
use log::info;

/// Up-front cost of building the park
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Investment {
    /// Chargers, including the shared equipment for each pair
    pub chargers: Money,
    /// Inverters for the panels
    pub inverter: Money,
    /// Solar panels
    pub panels: Money,
    /// Grid connection, sized for the larger of the charger load and the panel output
    pub grid_connection: Money,
    /// Battery storage
    pub batteries: Money,
}

impl Investment {
    /// Cost the park described by `config`
    pub fn new(config: &SimulationConfig) -> Self {
        let costs = &config.costs;
        let n_chargers = config.n_chargers;
        let chargers = costs.charger * Dimensionless(f64::from(n_chargers))
            + costs.charger_pair_extra * Dimensionless(f64::from(n_chargers / 2));
        let connection_size = config.charger_power().max(config.solar_capacity);

        Self {
            chargers,
            inverter: costs.inverter_per_kw * config.solar_capacity,
            panels: costs.panel_per_kw * config.solar_capacity,
            grid_connection: costs.grid_connection_per_kw * connection_size,
            batteries: costs.battery_per_kwh * config.battery_capacity,
        }
    }

    /// Total investment
    pub fn total(&self) -> Money {
        self.chargers + self.inverter + self.panels + self.grid_connection + self.batteries
    }
}

/// Money flowing in and out over the year, before depreciation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    /// Income from energy sold to the grid
    pub grid_sales: Money,
    /// Spending on energy bought from the grid
    pub grid_purchases: Money,
    /// Income from drivers, net of VAT
    pub charging_revenue: Money,
}

impl CashFlow {
    /// Price the year's energy flows
    pub fn new(tariffs: &Tariffs, totals: &EnergyAccumulators) -> Self {
        Self {
            grid_sales: tariffs.grid_sell_price * totals.grid_sold,
            grid_purchases: tariffs.grid_buy_price * totals.grid_bought,
            charging_revenue: tariffs.net_sales_price() * totals.car_charging,
        }
    }

    /// Net cash flow
    pub fn total(&self) -> Money {
        self.grid_sales - self.grid_purchases + self.charging_revenue
    }
}

/// Yearly depreciation of the park's assets.
///
/// Everything except the battery is written off linearly over its lifetime. The battery is written
/// off in proportion to the full cycles it went through.
pub fn depreciation(
    investment: &Investment,
    costs: &CostParameters,
    battery_cycles: u32,
) -> Money {
    let linear = |cost: Money, lifetime: u32| cost / Dimensionless(f64::from(lifetime));

    linear(investment.chargers, costs.charger_lifetime)
        + linear(investment.grid_connection, costs.grid_connection_lifetime)
        + linear(investment.inverter, costs.inverter_lifetime)
        + linear(investment.panels, costs.panel_lifetime)
        + investment.batteries
            * (Dimensionless(f64::from(battery_cycles))
                / Dimensionless(f64::from(costs.battery_cycle_life)))
}

/// Revenue, expenses and margin for the year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeStatement {
    /// Charging revenue plus grid sales
    pub revenue: Money,
    /// Spending on grid energy
    pub electricity_expense: Money,
    /// Write-down of the assets
    pub depreciation: Money,
}

impl IncomeStatement {
    /// Total expenses
    pub fn expenses(&self) -> Money {
        self.electricity_expense + self.depreciation
    }

    /// Revenue less expenses
    pub fn gross_income(&self) -> Money {
        self.revenue - self.expenses()
    }

    /// Gross income as a fraction of revenue, or `None` if there was no revenue
    pub fn gross_margin(&self) -> Option<Dimensionless> {
        (self.revenue > Money(0.0)).then(|| self.gross_income() / self.revenue)
    }
}

/// Years of cash flow needed to recoup the investment, or `None` if the park never pays back
pub fn payback_years(investment: Money, annual_cash_flow: Money) -> Option<Dimensionless> {
    (annual_cash_flow > Money(0.0)).then(|| investment / annual_cash_flow)
}

/// All the financial figures for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialReport {
    /// Up-front cost
    pub investment: Investment,
    /// Yearly cash flow
    pub cash_flow: CashFlow,
    /// Yearly income statement
    pub income: IncomeStatement,
    /// Full battery cycles over the year
    pub battery_cycles: u32,
}

impl FinancialReport {
    /// Compute the financial figures for a finished run
    pub fn new(config: &SimulationConfig, results: &SimulationResults) -> Self {
        let investment = Investment::new(config);
        let cash_flow = CashFlow::new(&config.tariffs, &results.totals);
        let battery_cycles = results.battery_cycles();
        let income = IncomeStatement {
            revenue: cash_flow.grid_sales + cash_flow.charging_revenue,
            electricity_expense: cash_flow.grid_purchases,
            depreciation: depreciation(&investment, &config.costs, battery_cycles),
        };

        Self {
            investment,
            cash_flow,
            income,
            battery_cycles,
        }
    }

    /// Years until the investment is recouped
    pub fn payback_years(&self) -> Option<Dimensionless> {
        payback_years(self.investment.total(), self.cash_flow.total())
    }

    /// Every line of the report, grouped into sections
    pub fn lines(&self) -> Vec<(&'static str, &'static str, f64)> {
        let investment = &self.investment;
        let cash_flow = &self.cash_flow;
        let income = &self.income;
        let mut lines = vec![
            ("investment", "chargers", investment.chargers.value()),
            ("investment", "inverter", investment.inverter.value()),
            ("investment", "panels", investment.panels.value()),
            ("investment", "grid_connection", investment.grid_connection.value()),
            ("investment", "batteries", investment.batteries.value()),
            ("investment", "total", investment.total().value()),
            ("cash_flow", "grid_sales", cash_flow.grid_sales.value()),
            ("cash_flow", "grid_purchases", cash_flow.grid_purchases.value()),
            ("cash_flow", "charging_revenue", cash_flow.charging_revenue.value()),
            ("cash_flow", "total", cash_flow.total().value()),
            ("income", "revenue", income.revenue.value()),
            ("income", "electricity_expense", income.electricity_expense.value()),
            ("income", "depreciation", income.depreciation.value()),
            ("income", "expenses", income.expenses().value()),
            ("income", "gross_income", income.gross_income().value()),
        ];

        if let Some(margin) = income.gross_margin() {
            lines.push(("income", "gross_margin", margin.value()));
        }
        if let Some(years) = self.payback_years() {
            lines.push(("return", "payback_years", years.value()));
        }

        lines
    }

    /// Write the report to the log
    pub fn log_summary(&self) {
        let investment = &self.investment;
        info!(
            "Investment: {:.0} (chargers {:.0}, inverter {:.0}, panels {:.0}, grid connection \
            {:.0}, batteries {:.0})",
            investment.total().value(),
            investment.chargers.value(),
            investment.inverter.value(),
            investment.panels.value(),
            investment.grid_connection.value(),
            investment.batteries.value()
        );

        let cash_flow = &self.cash_flow;
        info!(
            "Cash flow: {:.0} (grid sales {:.0}, grid purchases {:.0}, charging revenue {:.0})",
            cash_flow.total().value(),
            cash_flow.grid_sales.value(),
            cash_flow.grid_purchases.value(),
            cash_flow.charging_revenue.value()
        );

        let income = &self.income;
        info!(
            "Income statement: revenue {:.0}, expenses {:.0} (depreciation {:.0}), gross income \
            {:.0}",
            income.revenue.value(),
            income.expenses().value(),
            income.depreciation.value(),
            income.gross_income().value()
        );
        if let Some(margin) = income.gross_margin() {
            info!("Gross margin: {:.2}", margin.value());
        }

        match self.payback_years() {
            Some(years) => info!("Payback period: {:.1} years", years.value()),
            None => info!("The investment is never paid back"),
        }
    }
}
