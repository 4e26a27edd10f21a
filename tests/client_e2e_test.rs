/// Views driven through ApiClient against a live server.
mod common;

use cofrinho::client::{
    ApiClient, DashboardView, ExpensesView, IncomesView, PiggyBanksView, ReportsView,
};
use cofrinho::insights::InsightKind;
use cofrinho::models::*;
use time::macros::date;

async fn signed_in_client() -> (ApiClient, common::TestApp) {
    let (base_url, app) = common::spawn_test_server().await.expect("server");
    common::create_test_user(&app.state, "ana@example.com", "password123")
        .await
        .expect("create user");
    let api = ApiClient::new(base_url);
    let response = api
        .login("ana@example.com", "password123")
        .await
        .expect("login");
    api.set_token(response.token).await;
    (api, app)
}

fn expense(category_id: i64, amount: f64, date: &str, description: &str) -> ExpensePayload {
    ExpensePayload {
        amount,
        category_id,
        description: description.to_string(),
        date: date.to_string(),
        notes: None,
    }
}

/// Salary of 5000, March spending of 1500 (1000 groceries, 500 leisure),
/// February spending of 2000 and 300 in a piggy bank.
async fn seed_household(api: &ApiClient) -> (i64, i64, i64) {
    api.create_income(&IncomePayload {
        name: "Salário".to_string(),
        amount: 5000.0,
        recurrence: Recurrence::Monthly,
        receive_date: 5,
    })
    .await
    .expect("income");

    let groceries = api
        .create_category(&CategoryPayload {
            name: "Mercado".to_string(),
            color: "#FF7A00".to_string(),
            icon: "cart".to_string(),
        })
        .await
        .expect("groceries");
    let leisure = api
        .create_category(&CategoryPayload {
            name: "Lazer".to_string(),
            color: "#2196F3".to_string(),
            icon: "film".to_string(),
        })
        .await
        .expect("leisure");

    for payload in [
        expense(groceries.id, 1000.0, "2024-03-10", "Compras do mês"),
        expense(leisure.id, 500.0, "2024-03-12", "Show"),
        expense(groceries.id, 2000.0, "2024-02-08", "Compras de fevereiro"),
    ] {
        api.create_expense(&payload).await.expect("expense");
    }

    let bank = api
        .create_piggy_bank(&PiggyBankPayload {
            name: "Reserva".to_string(),
            goal: "Emergência".to_string(),
            bank: "Nubank".to_string(),
        })
        .await
        .expect("piggy bank");
    api.create_transaction(&PiggyTransactionPayload {
        piggy_bank_id: bank.id,
        amount: 300.0,
        kind: TransactionType::Deposit,
        description: None,
        date: Some("2024-03-01".to_string()),
    })
    .await
    .expect("deposit");

    (groceries.id, leisure.id, bank.id)
}

#[tokio::test]
async fn dashboard_aggregates_the_current_month() {
    let (api, _app) = signed_in_client().await;
    seed_household(&api).await;

    let dashboard = DashboardView::new(api);
    assert!(dashboard.refresh_on(date!(2024 - 03 - 15)).await);
    let snapshot = dashboard.snapshot().await;

    assert_eq!(snapshot.year, 2024);
    assert_eq!(snapshot.month, 2);
    assert_eq!(snapshot.total_income, 5000.0);
    assert_eq!(snapshot.month_expenses, 1500.0);
    assert_eq!(snapshot.balance, 3500.0);
    assert_eq!(snapshot.total_savings, 300.0);

    let slices: Vec<(&str, f64)> = snapshot
        .expense_slices
        .iter()
        .map(|s| (s.name.as_str(), s.value))
        .collect();
    assert_eq!(slices, vec![("Mercado", 1000.0), ("Lazer", 500.0)]);

    assert_eq!(snapshot.monthly_bars.len(), 12);
    assert_eq!(snapshot.monthly_bars[1].despesas, 2000.0);
    assert_eq!(snapshot.monthly_bars[2].despesas, 1500.0);
    assert!(snapshot.monthly_bars.iter().all(|b| b.receitas == 5000.0));

    let kinds: Vec<InsightKind> = snapshot.insights.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            InsightKind::SpendingRatio,
            InsightKind::SavingsPraise,
            InsightKind::TopCategory,
            InsightKind::SavingsTotal,
        ]
    );
    assert_eq!(
        snapshot.insights[0].text,
        "Você gastou 30.0% da sua renda este mês."
    );
    assert!(snapshot.insights[3].text.contains("R$ 300,00"));

    assert_eq!(snapshot.recent_incomes.len(), 1);
    let recent: Vec<&str> = snapshot
        .recent_expenses
        .iter()
        .map(|row| row.expense.date.as_str())
        .collect();
    assert_eq!(recent, vec!["2024-03-12", "2024-03-10", "2024-02-08"]);
    assert_eq!(snapshot.recent_expenses[0].category, "Lazer");
}

#[tokio::test]
async fn reports_compare_against_previous_month() {
    let (api, _app) = signed_in_client().await;
    seed_household(&api).await;

    let reports = ReportsView::new(api);
    assert!(reports.refresh_for(2024, 2).await);
    let snapshot = reports.snapshot().await;

    assert_eq!(snapshot.annual_income, 60000.0);
    assert_eq!(snapshot.annual_expenses, 3500.0);
    assert_eq!(snapshot.annual_balance, 56500.0);
    assert_eq!(snapshot.balance_line.len(), 12);
    assert_eq!(snapshot.balance_line[1].saldo, 3000.0);

    let ranking: Vec<(&str, Option<f64>)> = snapshot
        .ranking
        .iter()
        .map(|r| (r.name.as_str(), r.share_of_income))
        .collect();
    assert_eq!(ranking, vec![("Mercado", Some(20.0)), ("Lazer", Some(10.0))]);

    let kinds: Vec<InsightKind> = snapshot.insights.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            InsightKind::SpendingRatio,
            InsightKind::SavingsPraise,
            InsightKind::TopCategory,
            InsightKind::SpendingDecrease,
        ]
    );
    assert!(snapshot.insights[3].text.contains("25.0%"));
}

#[tokio::test]
async fn mutations_refresh_the_view() {
    let (api, _app) = signed_in_client().await;
    let incomes = IncomesView::new(api);

    let created = incomes
        .create(&IncomePayload {
            name: "Freela".to_string(),
            amount: 800.0,
            recurrence: Recurrence::Weekly,
            receive_date: 15,
        })
        .await
        .expect("create");
    let snapshot = incomes.snapshot().await;
    assert_eq!(snapshot.incomes.len(), 1);
    assert_eq!(snapshot.total_income, 800.0);

    let failed = incomes
        .update(
            created.id + 1000,
            &IncomePayload {
                name: "Nada".to_string(),
                amount: 1.0,
                recurrence: Recurrence::Monthly,
                receive_date: 1,
            },
        )
        .await;
    assert_eq!(failed.expect_err("missing income").status(), Some(404));
    assert_eq!(incomes.snapshot().await.total_income, 800.0);

    incomes.delete(created.id).await.expect("delete");
    let snapshot = incomes.snapshot().await;
    assert!(snapshot.incomes.is_empty());
    assert_eq!(snapshot.total_income, 0.0);
}

#[tokio::test]
async fn expenses_of_deleted_category_are_uncategorized() {
    let (api, _app) = signed_in_client().await;
    let (_, leisure, _) = seed_household(&api).await;

    let expenses = ExpensesView::new(api);
    expenses.delete_category(leisure).await.expect("delete");
    let snapshot = expenses.snapshot().await;

    assert_eq!(snapshot.categories.len(), 1);
    assert_eq!(snapshot.total_expenses, 3500.0);
    let show = snapshot
        .expenses
        .iter()
        .find(|row| row.expense.description == "Show")
        .expect("leisure expense kept");
    assert_eq!(show.category, "Sem categoria");
}

#[tokio::test]
async fn piggy_bank_view_tracks_balance_and_history() {
    let (api, _app) = signed_in_client().await;
    let (_, _, bank) = seed_household(&api).await;
    let piggy = PiggyBanksView::new(api);
    assert!(piggy.refresh().await);

    let overdraw = piggy
        .record_transaction(&PiggyTransactionPayload {
            piggy_bank_id: bank,
            amount: 1000.0,
            kind: TransactionType::Withdrawal,
            description: None,
            date: None,
        })
        .await;
    assert_eq!(overdraw.expect_err("overdraw").status(), Some(400));

    piggy
        .record_transaction(&PiggyTransactionPayload {
            piggy_bank_id: bank,
            amount: 100.0,
            kind: TransactionType::Withdrawal,
            description: Some("Conserto".to_string()),
            date: Some("2024-03-20".to_string()),
        })
        .await
        .expect("withdraw");

    let snapshot = piggy.snapshot().await;
    assert_eq!(snapshot.total_savings, 200.0);
    let history = snapshot.history(bank);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, TransactionType::Withdrawal);
    assert!(snapshot.history(bank + 1000).is_empty());

    piggy.delete(bank).await.expect("delete");
    let snapshot = piggy.snapshot().await;
    assert!(snapshot.piggy_banks.is_empty());
    assert_eq!(snapshot.total_savings, 0.0);
}

#[tokio::test]
async fn views_keep_previous_snapshot_when_signed_out() {
    let (api, _app) = signed_in_client().await;
    seed_household(&api).await;
    let dashboard = DashboardView::new(api.clone());
    assert!(dashboard.refresh_on(date!(2024 - 03 - 15)).await);

    api.clear_token().await;
    assert!(!dashboard.refresh_on(date!(2024 - 03 - 15)).await);
    assert_eq!(dashboard.snapshot().await.total_income, 5000.0);
}
