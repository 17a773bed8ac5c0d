//! Resource usage via `getrusage(2)`.

use launchkit_core::control::{RawFailure, RawResult, ResourceUsage, UsageTarget};

#[cfg(unix)]
pub(crate) fn resource_usage(who: UsageTarget) -> RawResult<ResourceUsage> {
    let target = match who {
        UsageTarget::SelfProcess => libc::RUSAGE_SELF,
        UsageTarget::Children => libc::RUSAGE_CHILDREN,
    };

    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::getrusage(target, &mut usage) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        return Err(RawFailure::new(err.raw_os_error().unwrap_or(-1), err.to_string()));
    }

    Ok(ResourceUsage {
        user_time_used: seconds(&usage.ru_utime),
        system_time_used: seconds(&usage.ru_stime),
        max_resident_set_size: usage.ru_maxrss as i64,
        shared_text_memory_size: usage.ru_ixrss as i64,
        unshared_data_size: usage.ru_idrss as i64,
        unshared_stack_size: usage.ru_isrss as i64,
        page_reclaims: usage.ru_minflt as i64,
        page_faults: usage.ru_majflt as i64,
        swaps: usage.ru_nswap as i64,
        block_input_operations: usage.ru_inblock as i64,
        block_output_operations: usage.ru_oublock as i64,
        messages_sent: usage.ru_msgsnd as i64,
        messages_received: usage.ru_msgrcv as i64,
        signals_received: usage.ru_nsignals as i64,
        voluntary_context_switches: usage.ru_nvcsw as i64,
        involuntary_context_switches: usage.ru_nivcsw as i64,
    })
}

#[cfg(unix)]
fn seconds(tv: &libc::timeval) -> f64 {
    tv.tv_sec as f64 + tv.tv_usec as f64 / 1_000_000.0
}

#[cfg(not(unix))]
pub(crate) fn resource_usage(_who: UsageTarget) -> RawResult<ResourceUsage> {
    Err(RawFailure::new(-1, "getrusage is not available on this platform"))
}
