//! Command line input handling

/// Command line arguments
#[derive(clap::Parser)]
#[command(
    author,
    version,
    about,
    subcommand_value_name = "sort",
    subcommand_help_heading = "Sorts",
    disable_help_subcommand = true
)]
pub struct Args {
    /// The sorting algorithm to run
    #[arg()]
    pub algorithm: Algorithm,
    /// The data type to use for sorting
    #[arg()]
    pub data: DataType,
    /// The algorithm variant, use `-v=-1` to print available options
    #[arg(short, long, default_value_t = 0)]
    pub variant: isize,
    /// The number of runs to do
    #[arg(short, long, default_value_t = 1_000)]
    pub runs: usize,
    /// The size of the slices to sort
    #[arg(short, long, default_value_t = 1_000_000)]
    pub size: usize,
    /// Seed for the rng
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// The default sort in [`std`]
    Std,
    /// Insertionsort
    Insertionsort,
    /// Quicksort
    Quicksort,
    /// Peeksort
    Peeksort,
    /// Mergesort
    Mergesort,
    /// Timsort
    Timsort,
    /// Powersort
    Powersort,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(clap::ValueEnum::to_possible_value(self).unwrap().get_name())
    }
}
macro_rules! declare_variants {
    (
        $name:ident {
            $(
                $top_algorithm:pat => [
                    $(
                        $variant:ty
                    ),*
                    $(,)?
                ]
            ),*
            $(,)?
        }
    ) => {
        pub struct $name;

        impl $name {
            pub fn variants(algorithm: Algorithm) -> impl Iterator<Item = String> {
                let mut variants = Vec::new();
                declare_variants! { @match_algorithm
                    algorithm => Variant
                    ($(
                        $top_algorithm => [
                            $($variant),*
                        ]
                    ),*)
                    {
                        variants.push(display::<Variant>())
                    }
                }
                variants.into_iter()
            }

            pub fn sorter<T: Ord>(algorithm: Algorithm, variant: usize) -> Option<fn(&mut [T])> {
                let mut index = 0;

                declare_variants! { @match_algorithm
                    algorithm => Variant
                    ($(
                        $top_algorithm => [
                            $($variant),*
                        ]
                    ),*)
                    {
                        if variant == index {
                            return Some(<Variant as Sort>::sort);
                        } else {
                            index += 1;
                        }
                    }
                }

                None
            }

            pub fn is_stable(algorithm: Algorithm, variant: usize) -> Option<bool> {
                let mut index = 0;

                declare_variants! { @match_algorithm
                    algorithm => Variant
                    ($(
                        $top_algorithm => [
                            $($variant),*
                        ]
                    ),*)
                    {
                        if variant == index {
                            return Some(<Variant as Sort>::IS_STABLE);
                        } else {
                            index += 1;
                        }
                    }
                }

                None
            }
        }
    };
    (@match_algorithm
        $alg:expr => $variant_name:ident
        ($(
            $top_algorithm:pat => [
                $($variant:ty),*
            ]
        ),*)
        $code:block
    ) => {
        match $alg {
            $(
                $top_algorithm => {
                    $(
                        {
                            type $variant_name = $variant;

                            $code
                        }
                    )*
                }
            )*
        }
    };
}

use crate::algorithms::*;

declare_variants! {
    AlgorithmVariants {
        Algorithm::Std => [
            StdSort,
            StdSort<false>,
        ],
        Algorithm::Insertionsort => [
            insertionsort::InsertionSort,
            insertionsort::InsertionSort<true>,
        ],
        Algorithm::Quicksort => [
            quicksort::QuickSort,
            quicksort::QuickSort<
                quicksort::DefaultRngFactory,
                quicksort::DefaultInsertionSort,
                { quicksort::DEFAULT_INSERTION_THRESHOLD },
                { quicksort::DEFAULT_NINTHER_THRESHOLD },
                true
            >,
        ],
        Algorithm::Peeksort => [
            peeksort::PeekSort,
        ],
        Algorithm::Mergesort => [
            mergesort::TopDownMergeSort,
            mergesort::TopDownMergeSort<
                mergesort::DefaultInsertionSort,
                mergesort::DefaultMergingMethod,
                mergesort::DefaultBufGuardFactory,
                1,
                false
            >,
            mergesort::TopDownMergeSort<
                mergesort::DefaultInsertionSort,
                mergesort::DefaultMergingMethod,
                mergesort::DefaultBufGuardFactory,
                1,
                true
            >,
            mergesort::BottomUpMergeSort<
                mergesort::DefaultInsertionSort,
                mergesort::DefaultMergingMethod,
                mergesort::DefaultBufGuardFactory,
                { mergesort::DEFAULT_INSERTION_THRESHOLD },
                true,
            >,
        ],
        Algorithm::Timsort => [
            timsort::TimSort,
            timsort::TimSort<
                timsort::DefaultInsertionSort,
                merging::CopyBoth,
                timsort::DefaultBufGuardFactory,
                { timsort::DEFAULT_MIN_MERGE },
            >,
            timsort::TimSort<
                insertionsort::InsertionSort<false>,
                merging::CopyBoth,
                timsort::DefaultBufGuardFactory,
                { timsort::DEFAULT_MIN_MERGE },
            >,
        ],
        Algorithm::Powersort => [
            powersort::PowerSort,
            powersort::PowerSort<1, true, true>,
            powersort::PowerSort<1, false, false>,
        ],
    }
}

impl AlgorithmVariants {
    pub fn validate(algorithm: Algorithm, variant: isize) -> Option<usize> {
        match variant.try_into() {
            Err(_) => None,
            Ok(result) => {
                if result < Self::variants(algorithm).count() {
                    Some(result)
                } else {
                    None
                }
            }
        }
    }
}

macro_rules! declare_data_types {
    (
        $(
            $name:ident : $type:ty, $d_type:ty
        ),*
        $(,)?
    ) => {
        /// Available data types for sorting
        #[derive(Clone, Copy, clap::ValueEnum)]
        pub enum DataType {
            $(
                $name
            ),*
        }

        declare_data_types! {
            @declare_match_macro
            $($name : $type, $d_type),* | $
        }
    };
    (@declare_match_macro $($name:ident : $type:ty, $d_type:ty),* | $dollar:tt) => {
        /// A hacky macro to dynamically "match" on type (:
        #[macro_export]
        macro_rules! with_match_type {
            ($dollar arg:expr; $dollar t:ident, $dollar d:ident => $dollar code:block) => {
                {
                    match $dollar arg {
                        $(
                            $crate::cli::DataType::$name => {
                                type $dollar t = $type;
                                type $dollar d = $d_type;

                                $dollar code
                            }
                        ),*
                    }
                }
            };
        }
    };
}

declare_data_types! {
    UniformU32: u32, crate::data::UniformData<u32>,
    UniformU64: u64, crate::data::UniformData<u64>,
    PermutationU32: u32, crate::data::PermutationData<u32>,
    PermutationU64: u64, crate::data::PermutationData<u64>,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(clap::ValueEnum::to_possible_value(self).unwrap().get_name())
    }
}
