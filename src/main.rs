#[tokio::main]
async fn main() {
  let code = power_sculpt_lib::run().await;
  std::process::exit(code);
}
