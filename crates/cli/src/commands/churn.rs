use super::http_client;
use crate::render;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use common::types::CustomerFeatures;
use dashboard::ChurnBoard;

#[derive(Debug, Subcommand)]
pub enum ChurnCommand {
    /// 学習済みモデルの一覧
    Models,
    /// 予測履歴
    Predictions,
    /// モデルを学習する
    Train,
    /// 顧客1人のチャーン確率を予測する
    Predict(PredictArgs),
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[arg(long)]
    pub customer_id: String,

    #[arg(long, default_value_t = 0)]
    pub age: u32,

    #[arg(long, default_value = "Male")]
    pub gender: String,

    #[arg(long, default_value = "Premium")]
    pub segment: String,

    /// 契約日数
    #[arg(long, default_value_t = 365)]
    pub subscription_length: u32,

    #[arg(long, default_value = "")]
    pub last_login_date: String,

    #[arg(long, default_value_t = 0)]
    pub total_orders: u32,

    #[arg(long, default_value_t = 0.0)]
    pub total_spent: f64,

    #[arg(long, default_value_t = 0.0)]
    pub avg_order_value: f64,
}

impl From<PredictArgs> for CustomerFeatures {
    fn from(args: PredictArgs) -> Self {
        Self {
            customer_id: args.customer_id,
            age: args.age,
            gender: args.gender,
            segment: args.segment,
            subscription_length: args.subscription_length,
            last_login_date: args.last_login_date,
            total_orders: args.total_orders,
            total_spent: args.total_spent,
            avg_order_value: args.avg_order_value,
        }
    }
}

pub async fn run(command: ChurnCommand) -> Result<()> {
    let board = ChurnBoard::new(http_client());
    match command {
        ChurnCommand::Models => {
            board.reload_models().await.context("Failed to load models")?;
            println!("{}", render::models(&board.models()));
        }
        ChurnCommand::Predictions => {
            board
                .reload_predictions()
                .await
                .context("Failed to load predictions")?;
            println!("{}", render::predictions(&board.predictions()));
        }
        ChurnCommand::Train => {
            let report = board.train().await.context("Model training failed")?;
            println!("{}", render::train_report(&report));
            println!();
            println!("{}", render::models(&board.models()));
        }
        ChurnCommand::Predict(args) => {
            let features = CustomerFeatures::from(args);
            let view = board.predict(&features).await.context("Prediction failed")?;
            println!("{}", render::prediction(&view));
        }
    }
    Ok(())
}
