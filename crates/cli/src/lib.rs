pub mod commands;
pub mod render;


use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(name = "runboard")]
#[clap(about = "Pipeline run history, uploads and churn predictions as text")]
#[clap(version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 実行履歴と集計
    History(commands::history::HistoryArgs),
    /// CSV をアップロードして履歴に現れるまで待つ
    Upload(commands::upload::UploadArgs),
    /// アップロード1件の分析結果
    Detail(commands::detail::DetailArgs),
    /// チャーンモデルの一覧・学習・予測
    #[clap(subcommand)]
    Churn(commands::churn::ChurnCommand),
    /// 予測値の要約（オフライン）
    Forecast(commands::forecast::ForecastArgs),
    /// ログインしてトークンを表示する
    Login(commands::login::LoginArgs),
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::History(args) => commands::history::run(args).await,
        Commands::Upload(args) => commands::upload::run(args).await,
        Commands::Detail(args) => commands::detail::run(args).await,
        Commands::Churn(command) => commands::churn::run(command).await,
        Commands::Forecast(args) => commands::forecast::run(args),
        Commands::Login(args) => commands::login::run(args).await,
    }
}
