use clap::{Parser, Subcommand};
use std::path::PathBuf;
use style_advisor_common::{Attire, Occasion};

#[derive(Parser)]
#[command(name = "style-advisor")]
#[command(about = "セルフィーから服装・色・髪型の提案を受け取る", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真を解析して提案を表示
    Analyze {
        /// 写真ファイル（JPEG/PNG/GIF/WebP）
        #[arg(required = true)]
        image: PathBuf,

        /// 場面（省略時は対話的に選択）
        #[arg(short, long)]
        occasion: Option<Occasion>,

        /// 服装
        #[arg(short, long)]
        attire: Option<Attire>,

        /// 結果をHTMLページとして保存
        #[arg(long)]
        html: Option<PathBuf>,

        /// 解析結果のJSONを保存
        #[arg(long)]
        json: Option<PathBuf>,

        /// スタイル画像を生成しない
        #[arg(long)]
        no_images: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 解析サービスのURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 選択できる場面・服装の一覧
    Options,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "style-advisor", "analyze", "me.jpg", "--occasion", "Formal-Event", "--attire", "smart-casual",
            "--no-images",
        ]);
        match cli.command {
            Commands::Analyze { image, occasion, attire, no_images, .. } => {
                assert_eq!(image, PathBuf::from("me.jpg"));
                assert_eq!(occasion, Some(Occasion::FormalEvent));
                assert_eq!(attire, Some(Attire::SmartCasual));
                assert!(no_images);
            }
            _ => panic!("analyze expected"),
        }
    }

    #[test]
    fn test_rejects_unknown_occasion() {
        assert!(Cli::try_parse_from(["style-advisor", "analyze", "me.jpg", "--occasion", "beach"]).is_err());
    }
}
