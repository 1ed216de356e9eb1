use super::http_client;
use anyhow::{Context, Result};
use clap::Args;
use client::AuthApi;
use common::types::LoginRequest;

#[derive(Debug, Args)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

/// 取得したトークンは `DASHBOARD_API_TOKEN` に設定して使う
pub async fn run(args: LoginArgs) -> Result<()> {
    let client = http_client();
    let request = LoginRequest {
        email: args.email,
        password: args.password,
    };
    let response = client.login(&request).await.context("Login failed")?;

    if let Some(name) = &response.full_name {
        eprintln!("Logged in as {name} <{}>", request.email);
    }
    println!("{}", response.access_token);
    Ok(())
}
