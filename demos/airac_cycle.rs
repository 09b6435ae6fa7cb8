use nasr_procedures::airac::AiracCycle;

fn main() {
    let cycle = AiracCycle::current();

    println!("{cycle}\t{}\t{}", cycle.effective, cycle.subscription_url());
}
