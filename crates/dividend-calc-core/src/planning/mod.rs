pub mod compound_interest;
pub mod dividend_growth;
pub mod investment_return;
pub mod savings_goal;
pub mod yield_on_cost;
