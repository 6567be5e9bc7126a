use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_boundary_order_amounts() {
    let below = common::upi_row(99, "below@bank");
    let at = common::upi_row(100, "at@bank");
    let large = common::upi_row(i64::MAX, "large@bank");
    let file = common::write_checkouts(&[&below, &at, &large]);

    let mut cmd = Command::new(cargo_bin!("paygate"));
    cmd.arg(file.path())
        .args(["--deterministic", "--processing-delay-ms", "0"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(",100,INR,upi,success,at@bank"))
        .stdout(predicate::str::contains(format!(
            ",{},INR,upi,success,large@bank",
            i64::MAX
        )))
        .stdout(predicate::str::contains("below@bank").not());
}

#[test]
fn test_boundary_card_lengths() {
    // 13 and 19 digit Luhn-valid numbers are accepted, 12 and 20 are not
    let thirteen = common::card_row(500, "4222222222222", "12", "2099");
    let nineteen = common::card_row(600, "4000000000000000006", "12", "2099");
    let twelve = common::card_row(700, "400000000002", "12", "2099");
    let twenty = common::card_row(800, "40000000000000000002", "12", "2099");
    let file = common::write_checkouts(&[&thirteen, &nineteen, &twelve, &twenty]);

    let mut cmd = Command::new(cargo_bin!("paygate"));
    cmd.arg(file.path())
        .args(["--deterministic", "--processing-delay-ms", "0"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(",500,INR,card,success,,visa,2222,,"))
        .stdout(predicate::str::contains(",600,INR,card,success,,visa,0006,,"))
        .stdout(predicate::str::contains(",700,").not())
        .stdout(predicate::str::contains(",800,").not());
}
