//! Console front-end: message link and report printer.
//!
//! Mode 0 prints reports only. Mode 1 also prints one line per miss (and
//! per hit with `--hit-show`) followed by the messages L1 sent to L2.

use l1sim_core::cache::{AccessOutcome, Resolution};
use l1sim_core::config::{CoherenceModel, DisplayMode};
use l1sim_core::hierarchy::EvictOutcome;
use l1sim_core::link::{BackingStoreLink, BusMessage, FetchIntent, MessageLog};
use l1sim_core::report::{CacheReport, Report, ReportSink};
use l1sim_core::sim::{StepOutcome, TraceEvent, TraceObserver};

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

/// Per-event console printer.
///
/// The console is the link the caches talk to: it buffers each event's
/// messages to L2 and prints them under the event once it completes.
#[derive(Debug)]
pub struct Console {
    mode: DisplayMode,
    hit_show: bool,
    pending: MessageLog,
}

impl Console {
    pub fn new(mode: DisplayMode, hit_show: bool) -> Self {
        Self {
            mode,
            hit_show,
            pending: MessageLog::new(),
        }
    }

    fn verbose(&self) -> bool {
        self.mode == DisplayMode::Messages
    }

    fn drain(&mut self) -> Vec<BusMessage> {
        self.pending.take()
    }

    /// Text printed for one completed event, or `None` if it is silent in
    /// the current mode.
    fn render_event(
        &self,
        line: usize,
        event: &TraceEvent,
        outcome: &StepOutcome,
    ) -> Option<String> {
        if !self.verbose() {
            return None;
        }
        match outcome {
            StepOutcome::Access(access) if access.is_hit() && !self.hit_show => None,
            StepOutcome::Access(access) => {
                Some(format!("[{line:>6}] {}", describe_access(access)))
            }
            StepOutcome::Evict(EvictOutcome::Invalidated(inv)) => Some(format!(
                "[{line:>6}] EVICTION FROM L2 <{:#010x}> L1({}) set {} way {}",
                event.address, inv.cache, inv.set, inv.way
            )),
            StepOutcome::Evict(EvictOutcome::Absent) => Some(format!(
                "[{line:>6}] EVICTION FROM L2 <{:#010x}> not in L1",
                event.address
            )),
            StepOutcome::Reset | StepOutcome::Reported => None,
        }
    }
}

impl BackingStoreLink for Console {
    fn fetch(&mut self, address: u32, intent: FetchIntent) {
        self.pending.fetch(address, intent);
    }

    fn writeback(&mut self, address: u32) {
        self.pending.writeback(address);
    }

    fn invalidate_ack(&mut self, address: u32) {
        self.pending.invalidate_ack(address);
    }
}

impl TraceObserver for Console {
    fn on_event(&mut self, line: usize, event: &TraceEvent, outcome: &StepOutcome) {
        let messages = self.drain();
        let Some(head) = self.render_event(line, event, outcome) else {
            return;
        };
        println!("{head}");
        for message in messages {
            println!("           Message to L2: {message}");
        }
    }

    fn on_inclusion_violation(&mut self, line: usize, address: u32) {
        let _ = self.drain();
        if self.verbose() {
            println!("[{line:>6}] ERROR: LINE NOT FOUND IN L1 <{address:#010x}>");
        }
    }
}

fn describe_access(outcome: &AccessOutcome) -> String {
    let head = format!("L1({:<5}) {}", outcome.cache, outcome.access);
    match outcome.resolution {
        Resolution::Hit => format!("{head} HIT  <{:#010x}>", outcome.address),
        Resolution::Refill => {
            format!("{head} MISS (same tag, invalid) <{:#010x}>", outcome.address)
        }
        Resolution::Fill | Resolution::Reuse => format!("{head} MISS <{:#010x}>", outcome.address),
        Resolution::Replace {
            victim,
            written_back,
        } => format!(
            "{head} MISS <{:#010x}> - L1 evict <{victim:#010x}>{}",
            outcome.address,
            if written_back { " (dirty)" } else { "" }
        ),
    }
}

/// Report sink that prints to stdout, as text or JSON.
#[derive(Debug)]
pub struct ConsoleSink {
    json: bool,
}

impl ConsoleSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl ReportSink for ConsoleSink {
    fn report(&mut self, report: &Report) {
        if self.json {
            match serde_json::to_string_pretty(report) {
                Ok(text) => println!("{text}"),
                Err(e) => eprintln!("[!] cannot serialize report: {e}"),
            }
            return;
        }
        print_report(report);
    }
}

fn print_contents(title: &str, cache: &CacheReport, coherence: CoherenceModel) {
    println!("{title}");
    let mut current_set = None;
    for line in &cache.lines {
        if current_set != Some(line.set) {
            println!("  Set Index: {}", line.set);
            current_set = Some(line.set);
        }
        let state = match coherence {
            CoherenceModel::DirtyBit => format!("Valid: 1 || Dirty: {}", u8::from(line.dirty)),
            CoherenceModel::Mesi => format!("MESI: {}", line.state),
        };
        println!(
            "    Way Index: {} || Address: {:#010x} || Tag: {:04} || LRU: {} || {state}",
            line.way, line.address, line.tag, line.rank
        );
    }
    if cache.lines.is_empty() {
        println!("  (no valid lines)");
    }
    println!("{THIN_RULE}");
}

fn print_stats(name: &str, cache: &CacheReport) {
    let s = &cache.stats;
    if s.accesses() == 0 {
        println!("  {name:<6} no operation was executed");
        return;
    }
    let ratio = cache
        .hit_ratio
        .map_or_else(|| "n/a".to_string(), |r| format!("{r:.4}"));
    println!(
        "  {name:<6} reads: {:<8} | writes: {:<8} | hits: {:<8} | misses: {:<8} \
         | writebacks: {:<8} | hit_ratio: {ratio}",
        s.reads, s.writes, s.hits, s.misses, s.writebacks
    );
}

fn print_report(report: &Report) {
    println!("\n{RULE}");
    println!("L1 CACHE SUMMARY AND STATISTICS");
    println!("{RULE}");
    print_contents("DATA CACHE CONTENT", &report.data, report.coherence);
    print_contents("INSTRUCTION CACHE CONTENT", &report.instruction, report.coherence);
    println!("STATISTICS");
    print_stats("L1-D", &report.data);
    print_stats("L1-I", &report.instruction);
    println!("{RULE}");
}
