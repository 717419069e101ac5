use clap::Parser;

#[derive(Parser, Debug)]
pub enum Command {
    /// Login and save the session cookies to the env file.
    Login(LoginArgs),
    /// Get the list of incomes.
    Incomes,
    /// Add an income.
    AddIncome(AddIncomeArgs),
    /// Get the list of tax periods.
    Taxes,
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// User email [default: API_USERNAME from the env file]
    #[arg(short, long, env = "API_USERNAME")]
    pub(crate) username: Option<String>,
    /// Password [default: API_PASSWORD from the env file]
    #[arg(short, long, env = "API_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Parser, Debug)]
pub struct AddIncomeArgs {
    /// Amount, as shown in the web form
    #[arg(short, long)]
    pub(crate) income: String,
    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) date: String,
    #[arg(long, default_value = "")]
    pub(crate) comment: String,
    #[arg(long, default_value = "UAH")]
    pub(crate) currency: String,
    /// Received in cash
    #[arg(long)]
    pub(crate) cash: bool,
}
