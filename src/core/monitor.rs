//! Monitoring script for a detached Data Pump job

use crate::core::generator::sql_escape;

/// Build the monitoring script for a job
///
/// Contains a status query, a progress query, an attach-and-wait block and a
/// commented-out stop block. The job name is the only input.
pub fn monitor_script(job_name: &str) -> String {
    let job = sql_escape(job_name);

    format!(
        r#"-- Monitoring script for Data Pump job {job}
SET SERVEROUTPUT ON
SET LINESIZE 200

-- Job status
SELECT owner_name, job_name, operation, job_mode, state, degree, attached_sessions
  FROM dba_datapump_jobs
 WHERE job_name = '{job}';

-- Progress
SELECT sid, serial#, opname, sofar, totalwork,
       ROUND(sofar / NULLIF(totalwork, 0) * 100, 2) AS pct_done,
       time_remaining
  FROM v$session_longops
 WHERE opname = '{job}'
   AND sofar <> totalwork;

-- Attach and wait for completion
DECLARE
  h1        NUMBER;
  job_state VARCHAR2(30);
BEGIN
  h1 := DBMS_DATAPUMP.ATTACH(job_name => '{job}', job_owner => USER);
  DBMS_DATAPUMP.WAIT_FOR_JOB(handle => h1, job_state => job_state);
  DBMS_OUTPUT.PUT_LINE('Job {job} finished with state: ' || job_state);
END;
/

-- Stop the job (uncomment to run)
-- DECLARE
--   h1 NUMBER;
-- BEGIN
--   h1 := DBMS_DATAPUMP.ATTACH(job_name => '{job}', job_owner => USER);
--   DBMS_DATAPUMP.STOP_JOB(handle => h1, immediate => 1, keep_master => 0);
-- END;
-- /
"#
    )
}
