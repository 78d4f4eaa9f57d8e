use clap::{arg,crate_version,value_parser,ArgMatches,Command};
use lz77kit::{lz77,driver};
use std::path::Path;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const RCH: &str = "unreachable was reached";

fn ok_to_overwrite(path_out: &str) -> bool {
    if let Ok(_f) = std::fs::File::open(path_out) {
        let mut ans = String::new();
        eprint!("{} exists, overwrite? (y/n) ",path_out);
        std::io::stdin().read_line(&mut ans).expect("could not read stdin");
        if ans.trim_end()=="y" || ans.trim_end()=="Y" {
            log::warn!("existing file will be overwritten");
            return true;
        }
        return false;
    }
    true
}

/// window options with defaults from `STD_OPTIONS`
fn get_options(cmd: &ArgMatches) -> lz77::Options {
    let mut opt = lz77::STD_OPTIONS;
    if let Some(n) = cmd.get_one::<usize>("lookahead") {
        opt.lookahead = *n;
    }
    if let Some(m) = cmd.get_one::<usize>("window") {
        opt.window = *m;
    }
    log::debug!("lookahead {}, window {}",opt.lookahead,opt.window);
    opt
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(arg!(-n --lookahead <N> "lookahead buffer size").value_parser(value_parser!(usize))
            .required(false))
        .arg(arg!(-w --window <M> "dictionary window size").value_parser(value_parser!(usize))
            .required(false))
}

fn main() -> STDRESULT
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help =
"Examples:
---------
Compress:      `lz77kit compress -i my_expanded -o my_compressed`
Expand:        `lz77kit expand -i my_compressed -o my_expanded`
Both:          `lz77kit run -i my_file -e my_compressed -o my_expanded`
The window size (-w) used to expand must be the same as the one used to compress.";

    let mut main_cmd = Command::new("lz77kit")
        .about("Compress and expand with sliding window LZ77")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(window_args(Command::new("compress")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("compress a file")));

    main_cmd = main_cmd.subcommand(window_args(Command::new("expand")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("expand a file")));

    main_cmd = main_cmd.subcommand(window_args(Command::new("run")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-e --encoded <PATH> "compressed path").required(true))
        .arg(arg!(-o --output <PATH> "expanded path").required(true))
        .about("compress a file, then expand the result")));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let opt = get_options(cmd);
        let mut in_file = std::fs::File::open(path_in)?;
        let mut out_file = std::fs::OpenOptions::new().write(true).truncate(false).create(true).open(path_out)?;
        let (in_size,out_size) = lz77::compress(&mut in_file,&mut out_file,&opt)?;
        out_file.set_len(opt.out_offset + out_size)?;
        eprintln!("compressed {} into {}",in_size,out_size);
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let opt = get_options(cmd);
        let mut in_file = std::fs::File::open(path_in)?;
        let mut out_file = std::fs::OpenOptions::new().write(true).truncate(false).create(true).open(path_out)?;
        let (in_size,out_size) = lz77::expand(&mut in_file,&mut out_file,&opt)?;
        out_file.set_len(opt.out_offset + out_size)?;
        eprintln!("expanded {} into {}",in_size,out_size);
    }

    if let Some(cmd) = matches.subcommand_matches("run") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_enc = cmd.get_one::<String>("encoded").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        if !ok_to_overwrite(path_enc) || !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let opt = get_options(cmd);
        let report = driver::run(Path::new(path_in),Path::new(path_enc),Path::new(path_out),&opt);
        match report.compress {
            Ok((in_size,out_size)) => eprintln!("compressed {} into {}",in_size,out_size),
            Err(e) => eprintln!("compress: {}",e)
        }
        match report.expand {
            Ok((in_size,out_size)) => eprintln!("expanded {} into {}",in_size,out_size),
            Err(e) => eprintln!("expand: {}",e)
        }
    }

    Ok(())
}
