use std::fmt;

/// Where a job application currently stands.
///
/// The numeric codes are the ones carried on the wire; the textual labels are
/// the ones persisted in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum JobApplicationStatus {
    #[default]
    Unspecified = 0,
    Applied = 1,
    Screening = 2,
    Interview = 3,
    Offer = 4,
    Rejected = 5,
    Withdrawn = 6,
    Accepted = 7,
}

impl JobApplicationStatus {
    pub const ALL: [JobApplicationStatus; 8] = [
        JobApplicationStatus::Unspecified,
        JobApplicationStatus::Applied,
        JobApplicationStatus::Screening,
        JobApplicationStatus::Interview,
        JobApplicationStatus::Offer,
        JobApplicationStatus::Rejected,
        JobApplicationStatus::Withdrawn,
        JobApplicationStatus::Accepted,
    ];

    /// Canonical uppercase label stored in the database.
    pub fn as_label(self) -> &'static str {
        match self {
            JobApplicationStatus::Applied => "APPLIED",
            JobApplicationStatus::Screening => "SCREENING",
            JobApplicationStatus::Interview => "INTERVIEW",
            JobApplicationStatus::Offer => "OFFER",
            JobApplicationStatus::Rejected => "REJECTED",
            JobApplicationStatus::Withdrawn => "WITHDRAWN",
            JobApplicationStatus::Accepted => "ACCEPTED",
            JobApplicationStatus::Unspecified => "UNSPECIFIED",
        }
    }

    /// Decode a stored label. Case and surrounding whitespace are ignored;
    /// anything unrecognized becomes `Unspecified`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "APPLIED" => JobApplicationStatus::Applied,
            "SCREENING" => JobApplicationStatus::Screening,
            "INTERVIEW" => JobApplicationStatus::Interview,
            "OFFER" => JobApplicationStatus::Offer,
            "REJECTED" => JobApplicationStatus::Rejected,
            "WITHDRAWN" => JobApplicationStatus::Withdrawn,
            "ACCEPTED" => JobApplicationStatus::Accepted,
            _ => JobApplicationStatus::Unspecified,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Decode a wire code, falling back to `Unspecified` for unknown values.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => JobApplicationStatus::Applied,
            2 => JobApplicationStatus::Screening,
            3 => JobApplicationStatus::Interview,
            4 => JobApplicationStatus::Offer,
            5 => JobApplicationStatus::Rejected,
            6 => JobApplicationStatus::Withdrawn,
            7 => JobApplicationStatus::Accepted,
            _ => JobApplicationStatus::Unspecified,
        }
    }
}

impl fmt::Display for JobApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
