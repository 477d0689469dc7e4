mod common;

use axum::http::StatusCode;

use common::*;

#[tokio::test]
async fn buy_more_than_affordable_is_rejected() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    // NFLX is $629.04: 16 shares = $10,064.64 > $10,000.00
    let response = post_form(&app, "/buy", "symbol=nflx&shares=16", Some(&cookie)).await;
    assert_redirect(&response, "/buy");
    assert!(follow(&app, &response, &cookie).await.contains("Insufficient funds"));

    let page = body_text(get(&app, "/", Some(&cookie)).await).await;
    assert!(!page.contains("NFLX"));
    assert!(page.contains("$10,000.00"));

    let history = body_text(get(&app, "/history", Some(&cookie)).await).await;
    assert!(!history.contains("NFLX"));
}

#[tokio::test]
async fn buy_updates_cash_portfolio_and_history() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    // 15 × $629.04 = $9,435.60
    let response = post_form(&app, "/buy", "symbol=nflx&shares=15", Some(&cookie)).await;
    assert_redirect(&response, "/");

    let page = follow(&app, &response, &cookie).await;
    assert!(page.contains("Purchase successful"));
    assert!(page.contains("NFLX"));
    assert!(page.contains("Netflix, Inc."));
    assert!(page.contains("$564.40")); // cash left
    assert!(page.contains("$9,435.60")); // row total
    assert!(page.contains("$10,000.00")); // grand total at unchanged price

    let history = body_text(get(&app, "/history", Some(&cookie)).await).await;
    assert!(history.contains("<td>BUY</td>"));
    assert!(history.contains(r#"<td class="num">15</td>"#));
}

#[tokio::test]
async fn buy_validates_input() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    let cases = [
        ("symbol=&shares=1", "Please input a symbol to buy shares"),
        ("symbol=ZZZZ&shares=1", "Invalid symbol"),
        ("symbol=AAPL&shares=0", "Please input a whole number of shares greater than 0"),
        ("symbol=AAPL&shares=-2", "Please input a whole number of shares greater than 0"),
        ("symbol=AAPL&shares=1.5", "Please input a whole number of shares greater than 0"),
        ("symbol=AAPL&shares=abc", "Please input a whole number of shares greater than 0"),
        ("symbol=KO&shares=%203", "Please input a whole number of shares greater than 0"),
        ("symbol=KO&shares=%203%20", "Please input a whole number of shares greater than 0"),
        ("symbol=AAPL&shares=99999999999999999999", "Not a valid number"),
        ("symbol=AAPL&shares=9999999999999999", "Not a valid number"),
    ];

    for (body, expected) in cases {
        let response = post_form(&app, "/buy", body, Some(&cookie)).await;
        assert_redirect(&response, "/buy");
        let page = follow(&app, &response, &cookie).await;
        assert!(page.contains(expected), "{body}: expected {expected:?}");
    }
}

#[tokio::test]
async fn sell_more_than_owned_is_rejected() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    post_form(&app, "/buy", "symbol=KO&shares=2", Some(&cookie)).await;

    let response = post_form(&app, "/sell", "symbol=KO&shares=3", Some(&cookie)).await;
    assert_redirect(&response, "/sell");
    let page = follow(&app, &response, &cookie).await;
    assert!(page.contains("You do not own enough shares for this transaction"));
    // still listed as sellable
    assert!(page.contains(r#"<option value="KO">KO</option>"#));

    let history = body_text(get(&app, "/history", Some(&cookie)).await).await;
    assert!(!history.contains("SELL"));
}

#[tokio::test]
async fn sell_validates_share_count() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    post_form(&app, "/buy", "symbol=KO&shares=4", Some(&cookie)).await;

    for body in ["symbol=KO&shares=%202", "symbol=KO&shares=2%20", "symbol=KO&shares=0", "symbol=KO&shares="] {
        let response = post_form(&app, "/sell", body, Some(&cookie)).await;
        assert_redirect(&response, "/sell");
        let page = follow(&app, &response, &cookie).await;
        assert!(page.contains("Please input a number of shares greater than 0"), "{body}");
    }

    let history = body_text(get(&app, "/history", Some(&cookie)).await).await;
    assert!(!history.contains("SELL"));
}

#[tokio::test]
async fn sell_unowned_stock_is_rejected() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    let response = post_form(&app, "/sell", "symbol=KO&shares=1", Some(&cookie)).await;
    assert_redirect(&response, "/sell");
    assert!(follow(&app, &response, &cookie).await.contains("You do not own this stock"));

    let response = post_form(&app, "/sell", "symbol=KO&shares=0", Some(&cookie)).await;
    assert!(follow(&app, &response, &cookie).await.contains("Please input a number of shares greater than 0"));

    let response = post_form(&app, "/sell", "shares=1", Some(&cookie)).await;
    assert!(follow(&app, &response, &cookie).await.contains("Please input a symbol to sell shares"));
}

#[tokio::test]
async fn sell_credits_cash_and_history_shows_negative_shares() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    // KO is $62.54
    post_form(&app, "/buy", "symbol=KO&shares=10", Some(&cookie)).await;
    let response = post_form(&app, "/sell", "symbol=ko&shares=4", Some(&cookie)).await;
    assert_redirect(&response, "/");

    let page = follow(&app, &response, &cookie).await;
    assert!(page.contains("Sold!"));
    // 10,000.00 − 625.40 + 250.16
    assert!(page.contains("$9,624.76"));
    assert!(page.contains(r#"<td class="num">6</td>"#));

    let history = body_text(get(&app, "/history", Some(&cookie)).await).await;
    assert!(history.contains(r#"<td class="num">-4</td>"#));
    assert!(history.contains("$250.16"));
    // newest first
    assert!(history.find("SELL").unwrap() < history.find("BUY").unwrap());
}

#[tokio::test]
async fn selling_everything_hides_the_row() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    post_form(&app, "/buy", "symbol=T&shares=3", Some(&cookie)).await;
    post_form(&app, "/sell", "symbol=T&shares=3", Some(&cookie)).await;

    let page = body_text(get(&app, "/", Some(&cookie)).await).await;
    assert!(!page.contains("AT&amp;T Inc."));
    let sell_page = body_text(get(&app, "/sell", Some(&cookie)).await).await;
    assert!(!sell_page.contains(r#"<option value="T">"#));
}

#[tokio::test]
async fn quick_order_from_portfolio_row() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    let response = post_form(&app, "/", "ordertype=buy&symbol=V&shares=2", Some(&cookie)).await;
    assert_redirect(&response, "/");
    assert!(follow(&app, &response, &cookie).await.contains("Purchase successful"));

    let response = post_form(&app, "/", "ordertype=sell&symbol=V&shares=5", Some(&cookie)).await;
    assert_redirect(&response, "/");
    assert!(follow(&app, &response, &cookie).await.contains("You do not own enough shares"));

    let response = post_form(&app, "/", "ordertype=short&symbol=V&shares=1", Some(&cookie)).await;
    assert!(follow(&app, &response, &cookie).await.contains("Transaction not supported"));
}

#[tokio::test]
async fn add_cash_accepts_only_menu_amounts() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    let response = post_form(&app, "/", "addcash=10000", Some(&cookie)).await;
    assert_redirect(&response, "/");
    let page = follow(&app, &response, &cookie).await;
    assert!(page.contains("Cash added!"));
    assert!(page.contains("$20,000.00"));

    let response = post_form(&app, "/", "addcash=777", Some(&cookie)).await;
    assert!(follow(&app, &response, &cookie).await.contains("Please select from the drop down menu to add cash"));

    let response = post_form(&app, "/", "addcash=lots", Some(&cookie)).await;
    assert!(follow(&app, &response, &cookie).await.contains("Not a valid number"));
}

#[tokio::test]
async fn quote_shows_price_or_flashes() {
    let app = build_test_router().await;
    let cookie = register(&app, "alice", "pw").await;

    let response = post_form(&app, "/quote", "symbol=aapl", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("A share of Apple Inc. (AAPL) costs $189.50."));

    let response = post_form(&app, "/quote", "symbol=", Some(&cookie)).await;
    assert_redirect(&response, "/quote");
    assert!(follow(&app, &response, &cookie).await.contains("Please submit a stock&#x27;s symbol to quote"));

    let response = post_form(&app, "/quote", "symbol=NOPE", Some(&cookie)).await;
    assert!(follow(&app, &response, &cookie).await.contains("Invalid symbol, try again"));
}

#[tokio::test]
async fn symbol_search_returns_json() {
    let app = build_test_router().await;

    let response = get(&app, "/symbols?q=micro", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let symbols: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["symbol"].as_str().unwrap())
        .collect();
    assert_eq!(symbols, vec!["AMD", "MSFT"]);

    let json: serde_json::Value =
        serde_json::from_str(&body_text(get(&app, "/symbols", None).await).await).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn users_do_not_see_each_other() {
    let app = build_test_router().await;
    let alice = register(&app, "alice", "pw").await;
    let bob = register(&app, "bob", "pw").await;

    post_form(&app, "/buy", "symbol=IBM&shares=1", Some(&alice)).await;

    let page = body_text(get(&app, "/", Some(&bob)).await).await;
    assert!(!page.contains("IBM"));
    let response = post_form(&app, "/sell", "symbol=IBM&shares=1", Some(&bob)).await;
    assert!(follow(&app, &response, &bob).await.contains("You do not own this stock"));
}
