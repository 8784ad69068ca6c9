//! Normalization of scheduler command output into records.
//!
//! Every parser tolerates surrounding whitespace, blank lines and column
//! header lines. An `Err` carries a description of the offending input.

use objrt_model::JobState;

use super::{JobDetailRecord, JobRecord, PartitionRecord};

const HEADER_TOKENS: &[&str] = &["PARTITION", "JOBID", "JOB_ID"];

/// Marker `sinfo` appends to the default partition.
const DEFAULT_PARTITION_MARKER: char = '*';

fn data_lines(output: &str) -> impl Iterator<Item = &str> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_header_line(line))
}

pub fn is_header_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|first| HEADER_TOKENS.contains(&first))
}

pub fn normalize_partition_name(raw: &str) -> &str {
    raw.trim().trim_end_matches(DEFAULT_PARTITION_MARKER).trim()
}

/// Lines of `<partition> <job count>`.
pub fn parse_partition_listing(
    output: &str,
) -> Result<Vec<PartitionRecord>, String> {
    data_lines(output)
        .map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next().map(normalize_partition_name);
            let count = fields.next();
            match (name, count, fields.next()) {
                (Some(name), Some(count), None) if !name.is_empty() => {
                    let job_count = count.parse::<u64>().map_err(|_| {
                        format!("invalid job count in partition line `{line}`")
                    })?;
                    Ok(PartitionRecord::new(name, job_count))
                }
                _ => Err(format!("unparsable partition line `{line}`")),
            }
        })
        .collect()
}

/// Lines of `<job id> [<state>]`.
pub fn parse_job_listing(output: &str) -> Result<Vec<JobRecord>, String> {
    data_lines(output)
        .map(|line| {
            let mut fields = line.split_whitespace();
            let job_id = fields
                .next()
                .ok_or_else(|| format!("unparsable job line `{line}`"))?;
            let state = fields
                .next()
                .map(str::parse::<JobState>)
                .transpose()
                .map_err(|err| format!("{err} in job line `{line}`"))?;
            Ok(JobRecord::new(job_id, state))
        })
        .collect()
}

/// `scontrol show job` output; the state is the `JobState=` field.
pub fn parse_job_detail(
    job_id: &str,
    output: &str,
) -> Result<JobDetailRecord, String> {
    let raw_state = output
        .split_whitespace()
        .find_map(|field| field.strip_prefix("JobState="))
        .ok_or_else(|| {
            format!("no JobState field in detail for job {job_id}")
        })?;

    let state = raw_state
        .parse::<JobState>()
        .map_err(|err| format!("{err} in detail for job {job_id}"))?;

    Ok(JobDetailRecord {
        job_id: job_id.to_string(),
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_listing_strips_headers_and_default_marker() {
        let output = "PARTITION JOBS\n  debug* 4\n\ngpu 0\nlong 12  \n";
        let records = parse_partition_listing(output).expect("parse");
        assert_eq!(
            records,
            vec![
                PartitionRecord::new("debug", 4),
                PartitionRecord::new("gpu", 0),
                PartitionRecord::new("long", 12),
            ]
        );
    }

    #[test]
    fn partition_listing_rejects_garbage_counts() {
        let err = parse_partition_listing("debug many\n").unwrap_err();
        assert!(err.contains("debug many"), "{err}");

        let err = parse_partition_listing("debug\n").unwrap_err();
        assert!(err.contains("unparsable"), "{err}");
    }

    #[test]
    fn job_listing_reads_ids_and_optional_states() {
        let output = "JOBID STATE\n4711 RUNNING\n4712 PD\n4713\n";
        let records = parse_job_listing(output).expect("parse");
        assert_eq!(
            records,
            vec![
                JobRecord::new("4711", Some(JobState::Running)),
                JobRecord::new("4712", Some(JobState::Pending)),
                JobRecord::new("4713", None),
            ]
        );
    }

    #[test]
    fn empty_listings_are_empty() {
        assert!(parse_partition_listing("").unwrap().is_empty());
        assert!(parse_job_listing("\n\n").unwrap().is_empty());
    }

    #[test]
    fn job_detail_extracts_job_state() {
        let output = "JobId=4711 JobName=relax\n   UserId=alice(1042) \
                      GroupId=users(100)\n   JobState=RUNNING Reason=None \
                      Dependency=(null)\n";
        let record = parse_job_detail("4711", output).expect("parse");
        assert_eq!(record.state, JobState::Running);
        assert_eq!(record.job_id, "4711");
    }

    #[test]
    fn job_detail_without_state_is_an_error() {
        let err =
            parse_job_detail("4711", "JobId=4711 JobName=relax").unwrap_err();
        assert!(err.contains("4711"), "{err}");
    }
}
