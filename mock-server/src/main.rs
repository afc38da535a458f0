use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let app = match (std::env::var("FLEXIBEE_USER"), std::env::var("FLEXIBEE_PASSWORD")) {
        (Ok(user), Ok(password)) => mock_server::app_with_credentials(&user, &password),
        _ => mock_server::app(),
    };
    println!("listening on {addr}");
    mock_server::run(listener, app).await
}
