/*
[INPUT]:  Task id from a previous upload (first CLI argument)
[OUTPUT]: Current report status printed to stdout
[POS]:    Examples - one-off report status query
[UPDATE]: When the report status contract changes
*/

use drawtest_adapter::*;

/// Example: check report status for an existing task
///
/// cargo run -p drawtest-adapter --example report_status_example -- <task_id>
#[tokio::main]
async fn main() {
    println!("=== Drawing Test Report Status Example ===\n");

    let Some(task_id) = std::env::args().nth(1) else {
        eprintln!("usage: report_status_example <task_id>");
        return;
    };

    let client = match DrawTestClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created for {}\n", client.base_url());

    match client.poll_status(&task_id).await {
        Ok(report) => {
            println!("✓ Status: {:?}", report.status);
            if let Some(url) = report.report_url {
                println!("✓ Report: {}", url);
            }
        }
        Err(e) => println!("✗ {}: {}", e.kind(), e),
    }
}
