use clap::Parser;

use bnet_rs::network::Network;
use bnet_rs::signal::Signal;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of primary inputs.
    #[arg(value_name = "INT", default_value = "4")]
    inputs: usize,

    /// Log every construction and rewriting step.
    #[clap(long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);
    let n = args.inputs.clamp(2, 16);

    let mut ntk = Network::new();
    let xs: Vec<Signal> = (0..n).map(|_| ntk.create_pi()).collect();

    // Parity computed twice: as a tree of XORs, and as a chain of ANDs/ORs.
    let parity = ntk.create_nary_xor(&xs);
    let mut chain = xs[0];
    for &x in &xs[1..] {
        let both = ntk.create_and(chain, x);
        let any = ntk.create_or(chain, x);
        chain = ntk.create_lt(both, any);
    }
    ntk.create_po(parity);
    ntk.create_po(chain);
    println!("ntk = {:?}", ntk);

    let before = ntk.simulate();
    println!("parity = {}", before[0]);
    println!("chain = {}", before[1]);
    assert_eq!(before[0], before[1]);

    // Both outputs compute the same function, so the chain can go.
    ntk.substitute_node(chain.node(), parity ^ chain.is_complemented());
    println!("after substitution: ntk = {:?}", ntk);
    println!("outputs = {:?}", ntk.outputs());

    let swept = ntk.take_out_dangling();
    println!("swept {} dangling nodes", swept);

    ntk.check_integrity()?;
    assert_eq!(ntk.simulate(), before);
    println!("ok");

    Ok(())
}
