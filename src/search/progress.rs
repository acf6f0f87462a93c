use super::engine::ProgressCallback;
use log::info;

/// Logs generation progress through the `log` facade
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        info!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, front_size: usize, archive_size: usize) {
        info!(
            "Generation {} complete. First front: {}, archive: {}",
            generation + 1,
            front_size,
            archive_size
        );
    }

    fn on_candidate_evaluated(&mut self, candidate_num: usize, total: usize) {
        if candidate_num % 10 == 0 || candidate_num == total {
            info!("  Evaluated {}/{} candidates", candidate_num, total);
        }
    }
}

/// Forwards progress over a channel, for embedding the search in a host
/// application that renders its own progress display
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete {
        generation: usize,
        front_size: usize,
        archive_size: usize,
    },
    CandidateEvaluated {
        current: usize,
        total: usize,
    },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, generation: usize, front_size: usize, archive_size: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            front_size,
            archive_size,
        });
    }

    fn on_candidate_evaluated(&mut self, candidate_num: usize, total: usize) {
        let _ = self.sender.send(ProgressMessage::CandidateEvaluated {
            current: candidate_num,
            total,
        });
    }
}
