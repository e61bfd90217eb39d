use std::path::PathBuf;
use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dropstore", author, version, about = "Anonymous file drop with capability tokens", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub(crate) tenant: TenantArgs,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// 选择租户：配置文件，或者仅给出存储根目录并使用默认配置
#[derive(Args, Debug)]
pub struct TenantArgs {
    /// 租户配置文件 (JSON)
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE", conflicts_with = "root")]
    pub config: Option<PathBuf>,

    /// 使用默认配置，以此目录作为存储根目录
    #[arg(short = 'r', long = "root", global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 上传一个文件、一段文本或一个链接
    #[command(visible_alias = "up", group(ArgGroup::new("content").required(true)))]
    Upload {
        /// 要上传的本地文件
        #[arg(group = "content")]
        file: Option<PathBuf>,

        /// 直接上传这段文本
        #[arg(short = 'p', long = "paste", group = "content")]
        paste: Option<String>,

        /// 从标准输入读取要上传的内容
        #[arg(long = "stdin", group = "content")]
        stdin: bool,

        /// 上传一个重定向链接
        #[arg(short = 'l', long = "link", group = "content")]
        link: Option<String>,

        /// 期望的公开名称 (被占用时自动生成)
        #[arg(short = 'n', long = "name")]
        name: Option<String>,

        /// 覆盖扩展名
        #[arg(short = 'e', long = "ext")]
        extension: Option<String>,

        /// 移动源文件而不是复制
        #[arg(long = "move", requires = "file")]
        move_source: bool,

        /// 以 JSON 输出回执
        #[arg(long = "json")]
        json: bool,
    },
    /// 列出存储中的对象，最新的在前
    #[command(visible_alias = "ls")]
    List {
        /// 页码，或 "all" / "random"
        #[arg(short = 'P', long = "page", default_value = "1")]
        page: String,

        /// 文件名通配符
        #[arg(short = 'g', long = "glob", conflicts_with = "regex")]
        glob: Option<String>,

        /// 文件名正则表达式
        #[arg(long = "regex")]
        regex: Option<String>,

        /// 只列出这些扩展名 (逗号分隔)
        #[arg(short = 'e', long = "ext", value_delimiter = ',', conflicts_with = "images")]
        extensions: Vec<String>,

        /// 只列出图片
        #[arg(short = 'i', long = "images")]
        images: bool,

        /// 起始日期 (含)，格式 YYYY-MM-DD
        #[arg(long = "since", value_name = "DATE")]
        since: Option<String>,

        /// 结束日期 (含)，格式 YYYY-MM-DD
        #[arg(long = "until", value_name = "DATE")]
        until: Option<String>,

        /// 最大文件大小 (字节，含)
        #[arg(long = "max-size")]
        max_size: Option<u64>,

        /// 以 JSON 输出
        #[arg(long = "json")]
        json: bool,
    },
    /// 查看令牌对应的对象
    #[command(visible_alias = "resolve")]
    Show {
        token: String,
    },
    /// 重命名令牌对应的对象 (保留扩展名)
    #[command(visible_alias = "mv")]
    Rename {
        token: String,
        new_name: String,
    },
    /// 替换令牌对应对象的内容
    #[command(group(ArgGroup::new("source").required(true)))]
    Edit {
        token: String,

        /// 新内容
        #[arg(short = 'p', long = "paste", group = "source")]
        paste: Option<String>,

        /// 从标准输入读取新内容
        #[arg(long = "stdin", group = "source")]
        stdin: bool,

        /// 从本地文件读取新内容
        #[arg(long = "from", group = "source")]
        from: Option<PathBuf>,
    },
    /// 删除令牌对应的对象 (移入隔离目录)
    #[command(visible_alias = "rm")]
    Delete {
        token: String,

        /// 租户密码，租户关闭了删除链接时需要
        #[arg(long = "password")]
        password: Option<String>,
    },
    /// 计算可写入配置 `password` 字段的密码摘要
    HashPassword {
        password: String,
    },
}
