/*!

This is the long-form manual for `vote_series` and `tsreport`.

## Input format

Each state is described by one JSON document, as published on the race pages of the
2020 presidential election. Only one path is read:

```text
data.races[0].timeseries
```

It is an array of samples, in time order:

```json
{
    "eevp": 10,
    "timestamp": "2020-11-04T05:01:27Z",
    "votes": 1000,
    "vote_shares": { "trumpd": 0.5, "bidenj": 0.45 }
}
```

Missing or null numbers are read as zero. A missing share is therefore counted as
part of the "other" share. A missing timestamp makes the whole state fail.

## Output columns

| column        | content                                                         |
|---------------|-----------------------------------------------------------------|
| `anomaly`     | `true` if the note is not empty (legacy schema only)            |
| `time_est`    | time of the sample in EST (UTC-5 all year), `YYYY-MM-DD HH:MM:SS`|
| `eevp`        | estimated percentage of the expected vote, as published         |
| `votes_total` | cumulative votes                                                |
| `share_*`     | shares of Biden, Trump, and of all the other candidates         |
| `total_*`     | cumulative votes of each candidate (latest schema only)         |
| `batch_*`     | votes added since the previous row (`delta_*` in legacy schema) |
| `note`        | the anomalies of this row, separated by `, `                    |

The share of the other candidates is the complement of the two named candidates,
truncated (not rounded) to three decimals. All the vote counts are truncated to
integers. The batches are computed on the exact products, then truncated.

Samples with zero votes are dropped by default, and the next row is compared to the
last row that was kept. They can be kept instead, with a zero share for the others
(`--zero-votes keep`).

## Anomalies

* `Total <n>`: the cumulative number of votes decreased.
* `Biden <n>`, `Trump <n>`, `Other <n>`: the batch of a candidate is below
  `-max_variation`, where `max_variation` is 0.1% of the votes (truncated). This is the
  largest decrease that the 3-digit precision of the shares can explain. These checks
  are not done when `max_variation` is 0. With `--strict-drops`, a batch equal to
  `-max_variation` is not flagged.

## Command line

```bash
# Download all the states into data/input
tsreport --download data/input

# Build one report
tsreport -i data/input/georgia.json -o georgia.csv

# Build all the reports and compare one with a reference
tsreport --input-dir data/input --out data/output
tsreport -i data/input/georgia.json -r data/output/georgia.csv
```

## Configuration

All the options may also be given in a JSON file with `--config`. The command line
takes precedence.

```json
{
    "inputDirectory": "data/input",
    "outputDirectory": "data/output",
    "states": ["georgia", "pennsylvania"],
    "reportSchema": "latest",
    "rules": {
        "zeroVotePolicy": "skip",
        "dropComparison": "inclusive",
        "noteSeparator": "comma"
    }
}
```

*/
