use crate::engine::runner::CaseRow;

pub fn print_summary(rows: &[CaseRow]) {
    let mut by_score = [0usize; 4];
    let mut failed = 0usize;
    let mut total_score = 0u64;

    for r in rows {
        match r.score {
            Some(s) => {
                by_score[(s as usize).min(3)] += 1;
                total_score += s as u64;
            }
            None => {
                failed += 1;
                eprintln!("FAILED [case {}]: {}", r.case_id, r.message);
            }
        }
    }

    let measured = rows.len() - failed;
    let mean = if measured > 0 {
        total_score as f64 / measured as f64
    } else {
        0.0
    };

    eprintln!(
        "Results: cases={} score3={} score2={} score1={} score0={} failed={} mean={:.2}",
        rows.len(),
        by_score[3],
        by_score[2],
        by_score[1],
        by_score[0],
        failed,
        mean
    );
}
